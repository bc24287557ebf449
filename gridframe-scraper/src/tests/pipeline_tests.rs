use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use gridframe_core::{GameId, GameRecord, IconCandidate, NO_CONSOLES_FOUND};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use super::*;

/// In-memory stand-in for the remote service that records every call.
#[derive(Default)]
struct FakeSource {
    games: HashMap<String, Vec<GameRecord>>,
    icons: HashMap<String, Vec<IconCandidate>>,
    files: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    fn with_game(mut self, query: &str, id: u64, name: &str) -> Self {
        self.games
            .entry(query.to_string())
            .or_default()
            .push(GameRecord::new(id, name));
        self
    }

    fn with_icon(mut self, id: u64, url: &str, bytes: Vec<u8>) -> Self {
        self.icons
            .entry(id.to_string())
            .or_default()
            .push(IconCandidate {
                url: url.to_string(),
                width: 1024,
                height: 1024,
            });
        self.files.insert(url.to_string(), bytes);
        self
    }

    fn with_missing_file(mut self, id: u64, url: &str) -> Self {
        self.icons
            .entry(id.to_string())
            .or_default()
            .push(IconCandidate {
                url: url.to_string(),
                width: 1024,
                height: 1024,
            });
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl IconSource for FakeSource {
    async fn search(&self, name: &str) -> Vec<GameRecord> {
        self.record(format!("search:{name}"));
        self.games.get(name).cloned().unwrap_or_default()
    }

    async fn list_icons(&self, game: &GameId) -> Vec<IconCandidate> {
        self.record(format!("icons:{game}"));
        self.icons.get(game.as_str()).cloned().unwrap_or_default()
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        self.record(format!("download:{url}"));
        self.files.get(url).cloned().ok_or(ScrapeError::ServerError {
            status: 404,
            message: "missing".to_string(),
        })
    }
}

fn icon_png(size: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(size, size, Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

struct Fixture {
    _dir: tempfile::TempDir,
    output: PathBuf,
    overlays: PathBuf,
}

/// Temp folders with a transparent-centred frame installed for `consoles`.
fn fixture(consoles: &[&str]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("Output");
    let overlays = dir.path().join("icon_overlays");
    for console in consoles {
        let console_dir = overlays.join(console);
        std::fs::create_dir_all(&console_dir).unwrap();
        let mut frame = RgbaImage::new(128, 128);
        for (x, y, px) in frame.enumerate_pixels_mut() {
            if x < 4 || y < 4 || x >= 124 || y >= 124 {
                *px = Rgba([0, 0, 0, 255]);
            }
        }
        frame.save(console_dir.join("overlay.png")).unwrap();
    }
    Fixture {
        _dir: dir,
        output,
        overlays,
    }
}

fn options(fx: &Fixture, console: &str) -> ProcessOptions {
    let mut options = ProcessOptions::new("abc", console, &fx.output, &fx.overlays);
    options.write_log = false;
    options
}

async fn run(
    source: &FakeSource,
    queue: &Queue,
    options: &ProcessOptions,
) -> (Result<RunReport, ValidationError>, Vec<ProcessEvent>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = process_queue(source, queue, options, tx).await;
    let mut events = Vec::new();
    while let Ok(e) = rx.try_recv() {
        events.push(e);
    }
    (report, events)
}

fn results(report: &RunReport) -> Vec<RunResult> {
    report.log.entries().iter().map(|e| e.result.clone()).collect()
}

#[test]
fn test_validate_rules() {
    let empty = Queue::new();
    let queue: Queue = ["Halo"].into_iter().collect();

    assert_eq!(validate(&empty, "abc", "NES"), Err(ValidationError::EmptyQueue));
    assert_eq!(validate(&queue, "  ", "NES"), Err(ValidationError::MissingApiKey));
    assert_eq!(
        validate(&queue, "abc", "Select Console"),
        Err(ValidationError::NoConsoleSelected)
    );
    assert_eq!(
        validate(&queue, "abc", NO_CONSOLES_FOUND),
        Err(ValidationError::NoConsoleSelected)
    );
    assert_eq!(validate(&queue, "abc", ""), Err(ValidationError::NoConsoleSelected));
    assert_eq!(validate(&queue, "abc", "NES"), Ok(()));
}

#[test]
fn test_output_path_is_deterministic() {
    let root = Path::new("/out");
    assert_eq!(
        output_path(root, "NES", "Halo"),
        Path::new("/out").join("NES").join("Halo.png")
    );
    assert_eq!(
        output_path(root, "NES", "Halo: Combat Evolved"),
        Path::new("/out").join("NES").join("Halo: Combat Evolved.png")
    );
    assert_eq!(output_file_stem("AC/DC \\ Live"), "AC_DC _ Live");
}

#[tokio::test]
async fn test_scenario_saved() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default()
        .with_game("Halo", 1, "Halo")
        .with_icon(1, "https://cdn.test/halo.png", icon_png(256));
    let queue: Queue = ["Halo"].into_iter().collect();

    let (report, events) = run(&source, &queue, &options(&fx, "NES")).await;
    let report = report.unwrap();

    let expected = fx.output.join("NES").join("Halo.png");
    assert_eq!(results(&report), vec![RunResult::Saved(expected.clone())]);
    assert_eq!(report.processed, 1);
    assert_eq!(report.total, 1);
    assert_eq!(report.completion_message(), "Processed 1 of 1 games");

    let saved = image::open(&expected).unwrap();
    assert_eq!(saved.color(), image::ColorType::Rgba8);
    let saved = saved.into_rgba8();
    assert_eq!(saved.dimensions(), (256, 256));
    // Frame border on top, rounded base in the middle
    assert_eq!(*saved.get_pixel(128, 1), Rgba([0, 0, 0, 255]));
    assert_eq!(*saved.get_pixel(128, 128), Rgba([200, 30, 30, 255]));

    assert_eq!(
        source.calls(),
        vec![
            "search:Halo",
            "icons:1",
            "download:https://cdn.test/halo.png"
        ]
    );

    assert_eq!(events.first(), Some(&ProcessEvent::Started { total: 1 }));
    assert!(events.contains(&ProcessEvent::ItemFound {
        index: 0,
        game_name: "Halo".to_string()
    }));
    assert_eq!(
        events.last(),
        Some(&ProcessEvent::Done {
            processed: 1,
            total: 1
        })
    );
}

#[tokio::test]
async fn test_scenario_not_found_stops_after_search() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default();
    let queue: Queue = ["Obscuretitle"].into_iter().collect();

    let (report, _) = run(&source, &queue, &options(&fx, "NES")).await;
    let report = report.unwrap();

    assert_eq!(results(&report), vec![RunResult::NotFound]);
    assert_eq!(source.calls(), vec!["search:Obscuretitle"]);
    assert!(!fx.output.join("NES").exists());
}

#[tokio::test]
async fn test_scenario_sentinel_console_rejected_without_calls() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default().with_game("Halo", 1, "Halo");
    let queue: Queue = ["Halo"].into_iter().collect();

    let (report, events) = run(&source, &queue, &options(&fx, NO_CONSOLES_FOUND)).await;

    assert_eq!(report.unwrap_err(), ValidationError::NoConsoleSelected);
    assert!(source.calls().is_empty());
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_scenario_missing_overlay_does_not_stop_queue() {
    // "GBA" has a folder but no frame asset
    let fx = fixture(&["NES"]);
    std::fs::create_dir_all(fx.overlays.join("GBA")).unwrap();

    let source = FakeSource::default()
        .with_game("Metroid", 7, "Metroid Fusion")
        .with_icon(7, "https://cdn.test/metroid.png", icon_png(256))
        .with_game("Zelda", 8, "The Minish Cap");
    let queue: Queue = ["Metroid", "Zelda", "Unknown"].into_iter().collect();

    let (report, _) = run(&source, &queue, &options(&fx, "GBA")).await;
    let report = report.unwrap();

    assert_eq!(
        results(&report),
        vec![
            RunResult::OverlayFailed,
            RunResult::NoIconsAvailable,
            RunResult::NotFound
        ]
    );
    assert_eq!(report.processed, 3);
    assert!(source.calls().contains(&"search:Unknown".to_string()));
    assert!(!fx.output.join("GBA").exists());
}

#[tokio::test]
async fn test_download_and_decode_failures() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default()
        .with_game("Gone", 1, "Gone")
        .with_missing_file(1, "https://cdn.test/gone.png")
        .with_game("Garbage", 2, "Garbage")
        .with_icon(2, "https://cdn.test/garbage.png", b"<html>oops</html>".to_vec());
    let queue: Queue = ["Gone", "Garbage"].into_iter().collect();

    let (report, _) = run(&source, &queue, &options(&fx, "NES")).await;
    assert_eq!(
        results(&report.unwrap()),
        vec![RunResult::DownloadFailed, RunResult::DownloadFailed]
    );
}

#[tokio::test]
async fn test_only_first_match_and_first_icon_used() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default()
        .with_game("Mario", 1, "Super Mario Bros.")
        .with_game("Mario", 2, "Super Mario Bros. 3")
        .with_icon(1, "https://cdn.test/first.png", icon_png(128))
        .with_icon(1, "https://cdn.test/second.png", icon_png(128));
    let queue: Queue = ["Mario"].into_iter().collect();

    let (report, _) = run(&source, &queue, &options(&fx, "NES")).await;
    let report = report.unwrap();

    assert_eq!(
        results(&report),
        vec![RunResult::Saved(
            fx.output.join("NES").join("Super Mario Bros..png")
        )]
    );
    assert_eq!(report.log.entries()[0].game_name.as_deref(), Some("Super Mario Bros."));
    assert_eq!(
        source.calls(),
        vec!["search:Mario", "icons:1", "download:https://cdn.test/first.png"]
    );
}

#[tokio::test]
async fn test_duplicate_entries_overwrite_same_file() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default()
        .with_game("Halo", 1, "Halo")
        .with_icon(1, "https://cdn.test/halo.png", icon_png(128));
    let queue: Queue = ["Halo", "Halo"].into_iter().collect();

    let (report, _) = run(&source, &queue, &options(&fx, "NES")).await;
    let report = report.unwrap();

    let expected = fx.output.join("NES").join("Halo.png");
    assert_eq!(
        results(&report),
        vec![RunResult::Saved(expected.clone()), RunResult::Saved(expected)]
    );
    let files: Vec<_> = std::fs::read_dir(fx.output.join("NES")).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_write_failure_becomes_error_and_queue_continues() {
    let fx = fixture(&["NES"]);
    // A file where the output root should be makes directory creation fail
    std::fs::create_dir_all(fx.output.parent().unwrap()).unwrap();
    std::fs::write(&fx.output, b"not a directory").unwrap();

    let source = FakeSource::default()
        .with_game("Halo", 1, "Halo")
        .with_icon(1, "https://cdn.test/halo.png", icon_png(128));
    let queue: Queue = ["Halo", "Nothing"].into_iter().collect();

    let (report, _) = run(&source, &queue, &options(&fx, "NES")).await;
    let results = results(&report.unwrap());

    assert!(matches!(&results[0], RunResult::Error(msg) if msg.contains("Halo.png")));
    assert_eq!(results[1], RunResult::NotFound);
}

#[tokio::test]
async fn test_results_tagged_with_queue_index_and_queue_untouched() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default();
    let queue: Queue = ["A", "B", "C"].into_iter().collect();
    let before = queue.clone();

    let (report, events) = run(&source, &queue, &options(&fx, "NES")).await;
    let report = report.unwrap();

    let indices: Vec<usize> = report.log.entries().iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert_eq!(queue, before);

    let finished: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            ProcessEvent::ItemFinished { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(finished, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_run_log_written_to_output_root() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default();
    let queue: Queue = ["Obscuretitle"].into_iter().collect();
    let mut opts = options(&fx, "NES");
    opts.write_log = true;

    let (report, events) = run(&source, &queue, &opts).await;
    let report = report.unwrap();

    let log_file = report.log_file.expect("log file written");
    assert_eq!(log_file.parent(), Some(fx.output.as_path()));
    let text = std::fs::read_to_string(&log_file).unwrap();
    assert!(text.contains("[NOT FOUND] Obscuretitle"));
    assert!(events.contains(&ProcessEvent::LogWritten { path: log_file }));
}

#[test]
fn test_options_trim_console() {
    let options = ProcessOptions::new("abc", "  NES ", "/out", "/overlays");
    assert_eq!(options.console, "NES");
    assert_eq!(options.console(), "NES");
}

#[tokio::test]
async fn test_padded_console_writes_into_trimmed_folder() {
    let fx = fixture(&["NES"]);
    let source = FakeSource::default()
        .with_game("Halo", 1, "Halo")
        .with_icon(1, "https://cdn.test/halo.png", icon_png(128));
    let queue: Queue = ["Halo"].into_iter().collect();
    let mut opts = options(&fx, "NES");
    opts.console = " NES ".to_string();

    let (report, _) = run(&source, &queue, &opts).await;
    let report = report.unwrap();

    let expected = fx.output.join("NES").join("Halo.png");
    assert_eq!(results(&report), vec![RunResult::Saved(expected.clone())]);
    assert!(expected.is_file());
    assert!(!fx.output.join(" NES ").exists());
}
