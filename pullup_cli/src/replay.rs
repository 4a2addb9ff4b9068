//! Replay execution: source assembly, the classifier loop, and output.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eyre::WrapErr;
use pullup_core::openpose::KeypointLayout;
use pullup_core::{FrameReader, FrameReport, KeypointFrame, PullUpSession, Received, RepEvent, Summary};
use pullup_traits::FrameSource;

use crate::cli::ReplayInput;
use crate::sources::{JsonlSource, OpenPoseDirSource};

/// Frames buffered between the reader thread and the classifier.
const READ_AHEAD: usize = 64;
/// How often the loop looks at the shutdown flag while the source is idle.
const POLL: Duration = Duration::from_millis(100);

type BoxedSource = Box<dyn FrameSource<Frame = KeypointFrame> + Send>;

pub struct ReplayOptions {
    pub per_frame: bool,
    pub json: bool,
    pub events_csv: Option<PathBuf>,
    pub fps: Option<f64>,
}

fn open_source(input: &ReplayInput, cfg: &pullup_config::Config) -> eyre::Result<BoxedSource> {
    if let Some(dir) = &input.openpose_dir {
        let layout: KeypointLayout = cfg.input.layout.into();
        let src = OpenPoseDirSource::open(dir, layout, cfg.input.confidence_threshold)?;
        tracing::info!(dir = %dir.display(), frames = src.remaining(), layout = layout.as_str(), "replaying openpose output");
        return Ok(Box::new(src));
    }
    match input.frames.as_deref() {
        Some(p) if p == Path::new("-") => {
            tracing::info!("replaying frames from stdin");
            Ok(Box::new(JsonlSource::new(std::io::BufReader::new(std::io::stdin()))))
        }
        Some(p) => {
            let file = std::fs::File::open(p).map_err(|e| {
                std::io::Error::new(e.kind(), format!("{}: {e}", p.display()))
            })?;
            tracing::info!(file = %p.display(), "replaying frames");
            Ok(Box::new(JsonlSource::new(std::io::BufReader::new(file))))
        }
        None => eyre::bail!("no replay input given"),
    }
}

fn print_report(out: &mut impl Write, r: &FrameReport, json: bool) -> std::io::Result<()> {
    if json {
        let line = serde_json::to_string(r).map_err(std::io::Error::other)?;
        return writeln!(out, "{line}");
    }
    let chin = r
        .chin
        .map_or_else(|| "-".to_string(), |p| format!("({},{})", p.x, p.y));
    write!(
        out,
        "frame {:>6} t={:>8.3}s phase={:<9} hang={:<5} clean={} unclean={} chin={}",
        r.frame_index,
        r.time_s,
        r.phase.as_str(),
        r.hang,
        r.clean,
        r.unclean,
        chin
    )?;
    if let Some(ev) = &r.event {
        write!(out, " event={}", ev.kind.as_str())?;
    }
    writeln!(out)
}

pub fn print_summary(out: &mut impl Write, s: &Summary, json: bool) -> std::io::Result<()> {
    if json {
        let v = serde_json::json!({ "summary": s });
        return writeln!(out, "{v}");
    }
    writeln!(
        out,
        "frames={} hang_frames={} clean={} unclean={} phase={} duration_s={:.3}",
        s.frames,
        s.hang_frames,
        s.clean,
        s.unclean,
        s.phase.as_str(),
        s.duration_s
    )
}

fn write_events_csv(path: &Path, events: &[RepEvent]) -> eyre::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .wrap_err_with(|| format!("failed to create events CSV {}", path.display()))?;
    if events.is_empty() {
        wtr.write_record(["kind", "frame_index", "time_s", "clean_total", "unclean_total"])?;
    }
    for ev in events {
        wtr.serialize(ev)?;
    }
    wtr.flush()?;
    tracing::info!(path = %path.display(), events = events.len(), "events written");
    Ok(())
}

/// Run a full replay. Returns the summary; on interruption the summary covers the frames seen.
pub fn run_replay(
    cfg: &pullup_config::Config,
    input: &ReplayInput,
    opts: &ReplayOptions,
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<Summary> {
    let mut input_cfg: pullup_core::InputCfg = (&cfg.input).into();
    if let Some(fps) = opts.fps {
        input_cfg.fps = fps;
    }
    let mut session = PullUpSession::new((&cfg.qualifier).into(), &input_cfg)?;
    let mut reader = FrameReader::spawn(open_source(input, cfg)?, READ_AHEAD);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut interrupted = false;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::warn!(frames = session.frames_seen(), "interrupted; stopping replay");
            interrupted = true;
            break;
        }
        let frame = match reader.recv_timeout(POLL)? {
            Received::Frame(f) => f,
            Received::Idle => continue,
            Received::End => break,
        };
        let report = session.process(&frame);
        if opts.per_frame {
            print_report(&mut out, &report, opts.json)?;
        }
    }

    let events_csv = opts
        .events_csv
        .clone()
        .or_else(|| cfg.output.events_csv.as_ref().map(PathBuf::from));
    if let Some(path) = events_csv {
        write_events_csv(&path, session.events())?;
    }

    let summary = session.summary();
    print_summary(&mut out, &summary, opts.json)?;
    out.flush()?;
    if interrupted {
        // The source may be parked on stdin; don't wait for it.
        reader.detach();
    }
    Ok(summary)
}
