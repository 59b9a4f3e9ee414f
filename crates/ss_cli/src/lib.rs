//! Headless Match Runner Library
//!
//! 경기 실행 → 요약 / 최종 스냅샷 / 트레이스
//! Trace files reuse the cache pipeline: MessagePack → LZ4 압축 → SHA256 체크섬

pub mod logging;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use ss_core::{MatchSnapshot, Score, SimConfig, SimRng, TimedEvent, World};

/// 트레이스 스키마 버전
pub const TRACE_SCHEMA_VERSION: &str = "v1";

/// Default spacing between recorded frames (one simulated second).
pub const DEFAULT_TRACE_EVERY: u64 = 30;

/// How to run one headless match.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: SimConfig,
    pub ticks: u64,
    /// Overrides `config.seed` when set.
    pub seed: Option<u64>,
    /// Record a snapshot every `k` ticks. `None` records nothing.
    pub trace_every: Option<u64>,
}

impl RunOptions {
    pub fn new(config: SimConfig, ticks: u64) -> Self {
        Self {
            config,
            ticks,
            seed: None,
            trace_every: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trace_every(mut self, every: u64) -> Self {
        self.trace_every = Some(every.max(1));
        self
    }
}

/// Result of [`run_match`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub seed: u64,
    pub score: Score,
    /// Event counts keyed by event kind.
    pub event_counts: BTreeMap<String, u64>,
    /// Every event raised, including the ones from building the world.
    pub events: Vec<TimedEvent>,
    pub final_snapshot: MatchSnapshot,
    /// Recorded frames (empty unless tracing). Frame 0 is the kick-off.
    pub frames: Vec<MatchSnapshot>,
}

impl RunSummary {
    pub fn to_trace(&self) -> MatchTrace {
        MatchTrace {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            seed: self.seed,
            frames: self.frames.clone(),
        }
    }
}

/// Runs a seeded match for `opts.ticks` ticks.
pub fn run_match(opts: &RunOptions) -> Result<RunSummary> {
    let seed = opts.seed.unwrap_or(opts.config.seed);
    let config = opts.config.clone().with_seed(seed);
    let mut world =
        World::new(config, Box::new(SimRng::seeded(seed))).context("Failed to build match world")?;

    let mut events = world.drain_events();
    let mut frames = Vec::new();
    if opts.trace_every.is_some() {
        frames.push(world.snapshot());
    }

    for _ in 0..opts.ticks {
        world.update();
        events.extend(world.drain_events());

        if let Some(every) = opts.trace_every {
            if world.tick() % every == 0 {
                frames.push(world.snapshot());
            }
        }
    }

    let score = world.score();
    log::info!(
        "Match finished after {} ticks: red {} - {} blue (seed {})",
        world.tick(),
        score.red,
        score.blue,
        seed
    );

    let event_counts = world
        .events()
        .counts()
        .iter()
        .map(|(kind, n)| (kind.to_string(), *n))
        .collect();

    Ok(RunSummary {
        ticks: world.tick(),
        seed,
        score,
        event_counts,
        events,
        final_snapshot: world.snapshot(),
        frames,
    })
}

/// Writes a snapshot as pretty JSON, creating parent directories.
pub fn write_snapshot_json(snapshot: &MatchSnapshot, path: &Path) -> Result<()> {
    let json = snapshot.to_json().context("Failed to serialize snapshot")?;
    create_parent_dir(path)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    Ok(())
}

// ========== Trace files ==========

/// Recorded frames of one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTrace {
    pub schema_version: String,
    pub seed: u64,
    pub frames: Vec<MatchSnapshot>,
}

/// 트레이스 메타데이터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceMetadata {
    /// 스키마 버전 (예: "v1")
    pub schema_version: String,
    /// SHA256 체크섬 of the compressed bytes (hex 문자열)
    pub checksum: String,
    /// 생성 시각 (RFC3339 형식)
    pub created_at: String,
    pub frame_count: usize,
    /// MessagePack 크기 (bytes)
    pub original_size: u64,
    /// 압축 후 크기 (bytes)
    pub compressed_size: u64,
    /// 압축률 (압축 후 / 원본)
    pub compression_ratio: f64,
}

/// Encodes a trace as MessagePack + LZ4 and writes it to `out`.
pub fn write_trace(trace: &MatchTrace, out: &Path) -> Result<TraceMetadata> {
    // 1. MessagePack 직렬화
    let msgpack_bytes =
        rmp_serde::to_vec_named(trace).context("Failed to serialize trace to MessagePack")?;
    let original_size = msgpack_bytes.len() as u64;

    // 2. LZ4 압축 (크기 정보 포함)
    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;

    // 3. SHA256 체크섬 계산
    let checksum = sha256_hex(&compressed);

    // 4. 출력 파일 쓰기
    create_parent_dir(out)?;
    fs::write(out, &compressed)
        .with_context(|| format!("Failed to write trace file: {}", out.display()))?;

    Ok(TraceMetadata {
        schema_version: trace.schema_version.clone(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        frame_count: trace.frames.len(),
        original_size,
        compressed_size,
        compression_ratio: compressed_size as f64 / original_size.max(1) as f64,
    })
}

/// 트레이스 파일의 무결성 검증
pub fn verify_trace(path: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read trace file: {}", path.display()))?;
    Ok(sha256_hex(&bytes) == expected_checksum.to_lowercase())
}

/// 트레이스 파일을 압축 해제하여 MessagePack 디코딩
pub fn load_trace(path: &Path) -> Result<MatchTrace> {
    let compressed = fs::read(path)
        .with_context(|| format!("Failed to read trace file: {}", path.display()))?;

    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;

    let trace: MatchTrace =
        rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize MessagePack")?;

    if trace.schema_version != TRACE_SCHEMA_VERSION {
        log::warn!(
            "Trace schema {} differs from {}",
            trace.schema_version,
            TRACE_SCHEMA_VERSION
        );
    }
    Ok(trace)
}

/// `<trace>.meta.json`
pub fn metadata_path(trace_path: &Path) -> PathBuf {
    let mut name = trace_path.as_os_str().to_owned();
    name.push(".meta.json");
    PathBuf::from(name)
}

pub fn write_metadata(path: &Path, meta: &TraceMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write metadata: {}", path.display()))?;
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    Ok(())
}
