use std::path::PathBuf;

use exporter::batch::{Outcome, Summary};
use exporter::{Config, DiscoverError, ProcessError};
use pretty_assertions::assert_eq;

fn touch(path: &std::path::Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
}

#[test]
fn finds_demos_in_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("b.dem"));
    touch(&root.join("a.dem"));
    touch(&root.join("notes.txt"));
    touch(&root.join("a.json"));
    touch(&root.join("season/week1/c.dem"));

    let found = exporter::discover::find_demos(&[root.to_path_buf()]).unwrap();

    assert_eq!(
        vec![
            root.join("a.dem"),
            root.join("b.dem"),
            root.join("season/week1/c.dem"),
        ],
        found
    );
}

#[test]
fn single_files_and_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let demo = dir.path().join("match.dem");
    touch(&demo);

    let found =
        exporter::discover::find_demos(&[demo.clone(), dir.path().to_path_buf()]).unwrap();
    assert_eq!(vec![demo], found);
}

#[test]
fn missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let result = exporter::discover::find_demos(&[missing.clone()]);
    assert!(matches!(result, Err(DiscoverError::Missing(p)) if p == missing));
}

#[test]
fn output_next_to_demo() {
    assert_eq!(
        PathBuf::from("/data/demos/match.json"),
        exporter::batch::output_path(std::path::Path::new("/data/demos/match.dem"))
    );
}

#[test]
#[tracing_test::traced_test]
fn existing_export_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let demo = dir.path().join("match.dem");
    let output = dir.path().join("match.json");
    touch(&demo);
    std::fs::write(&output, b"{}").unwrap();

    let outcome = exporter::batch::process_file(&demo, true).unwrap();

    assert_eq!(Outcome::AlreadyExported(output.clone()), outcome);
    assert_eq!(b"{}".to_vec(), std::fs::read(&output).unwrap());
    assert!(logs_contain("Already exported"));
}

#[test]
fn unreadable_demo_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let demo = dir.path().join("gone.dem");

    let result = exporter::batch::process_file(&demo, false);

    assert!(matches!(result, Err(ProcessError::Open { .. })));
    assert!(!dir.path().join("gone.json").exists());
}

#[tokio::test]
async fn failures_do_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let exported = dir.path().join("old.dem");
    touch(&exported);
    std::fs::write(dir.path().join("old.json"), b"{}").unwrap();
    let missing = dir.path().join("missing.dem");

    let config = Config {
        paths: vec![dir.path().to_path_buf()],
        skip_existing: true,
        jobs: 2,
    };
    let summary: Summary = exporter::batch::run(vec![exported, missing.clone()], &config).await;

    assert_eq!(0, summary.exported);
    assert_eq!(1, summary.skipped);
    assert_eq!(1, summary.failed.len());
    assert_eq!(missing, summary.failed[0].0);
    assert_eq!(2, summary.total());
}

#[tokio::test]
async fn crashed_job_keeps_its_path() {
    let files = vec![PathBuf::from("good.dem"), PathBuf::from("bad.dem")];
    let config = Config {
        paths: Vec::new(),
        skip_existing: false,
        jobs: 1,
    };

    let summary = exporter::batch::run_with(files, &config, |path: &std::path::Path, _| {
        if path.ends_with("bad.dem") {
            panic!("decoder crashed");
        }
        Ok(Outcome::Exported(exporter::batch::output_path(path)))
    })
    .await;

    assert_eq!(1, summary.exported);
    assert_eq!(1, summary.failed.len());
    assert_eq!(PathBuf::from("bad.dem"), summary.failed[0].0);
}

fn game() -> analysis::Game {
    let mut game = analysis::Game::from_header(&analysis::DemoHeader {
        map_name: "de_inferno".to_owned(),
        playback_ticks: 6400,
        playback_time: 100.0,
        signon_length: 3,
    })
    .unwrap();
    game.team_1 = "Alpha".to_owned();
    game.team_2 = "Bravo".to_owned();
    game.team_1_result = 1;
    game.winner = "Alpha".to_owned();

    let round = |round_number, end_reason| analysis::Round {
        round_number,
        start_tick: 100,
        unfreeze_tick: 740,
        end_tick: 2000,
        official_end_tick: 2448,
        bomb_planted: false,
        bomb_planted_at: 0,
        bomb_defused: false,
        bomb_defused_at: 0,
        bomb_exploded: false,
        bomb_exploded_at: 0,
        ace: false,
        ace_by: String::new(),
        ct: "Alpha".to_owned(),
        ct_score: 1,
        previous_ct_score: 0,
        ct_kills: 5,
        ct_players_remaining: 3,
        t: "Bravo".to_owned(),
        t_score: 0,
        previous_t_score: 0,
        t_kills: 2,
        t_players_remaining: 0,
        duration: 37,
        cut_duration: 27,
        winner: "Alpha".to_owned(),
        end_reason,
        was_mismatch_kills: false,
    };
    game.rounds.push(round(1, Some(analysis::EndReason::TeamKill)));
    game.rounds.push(round(2, None));

    game
}

#[test]
fn export_carries_game_and_rounds() {
    let export = exporter::export::to_export(game());

    assert_eq!("de_inferno_36400", export.id);
    assert_eq!("1.1", export.version);
    assert_eq!(2, export.rounds_number);
    assert_eq!(64.0, export.tick_rate);
    assert_eq!("Alpha", export.winner);
    assert_eq!("team_kill", export.rounds[0].end_reason);
    assert_eq!("", export.rounds[1].end_reason);
    assert_eq!(3, export.rounds[0].ct_players_remaining);
}

#[test]
fn written_export_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.json");
    let export = exporter::export::to_export(game());

    exporter::export::write(&path, &export).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(serde_json::json!("team_kill"), value["rounds"][0]["end_reason"]);
    assert_eq!(serde_json::json!(2), value["rounds_number"]);
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing/match.json");

    let result = exporter::export::write(&path, &exporter::export::to_export(game()));
    assert!(matches!(result, Err(ProcessError::Write { .. })));
}
