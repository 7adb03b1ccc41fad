use std::fs;

use videocut::config::JobDefaults;
use videocut::engine::Segment;
use videocut::jobfile::load_jobs;

#[test]
fn loads_a_realistic_job_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.conf");
    fs::write(
        &path,
        "\
# weekly highlights
[intro]
input = /videos/stream.mp4
output = /videos/intro.mp4
crf = 22
hwaccel = cpu
00:01:30 00:02:45

[main]
input = /videos/stream.mp4
output = /videos/main.mp4
width = 1280
height = 720
fps = 60
05:00 07:30
90 105, ignored trailing tokens
",
    )
    .unwrap();

    let jobs = load_jobs(&path, &JobDefaults::default()).unwrap();
    assert_eq!(jobs.len(), 2);

    assert_eq!(jobs[0].name, "intro");
    assert_eq!(jobs[0].crf, "22");
    assert_eq!(jobs[0].hwaccel, "cpu");
    assert_eq!(jobs[0].segments, vec![Segment { start: 90, end: 165 }]);

    assert_eq!(jobs[1].name, "main");
    assert_eq!(jobs[1].width, "1280");
    assert_eq!(jobs[1].height, "720");
    assert_eq!(jobs[1].fps, "60");
    assert_eq!(
        jobs[1].segments,
        vec![Segment { start: 300, end: 450 }, Segment { start: 90, end: 105 }]
    );
    // Keys not set in the file keep their defaults
    assert_eq!(jobs[1].crf, "20");
    assert_eq!(jobs[1].hwaccel, "auto");
}

#[test]
fn missing_file_reports_the_path() {
    let err = load_jobs(
        std::path::Path::new("/no/such/jobs.conf"),
        &JobDefaults::default(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("/no/such/jobs.conf"));
}

#[test]
fn parse_errors_carry_line_numbers_through_the_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.conf");
    fs::write(
        &path,
        "[job]\ninput = a.mp4\noutput = b.mp4\n01:99 02:00\n",
    )
    .unwrap();

    let err = load_jobs(&path, &JobDefaults::default()).unwrap_err();
    assert!(format!("{err:#}").starts_with("line 4:"));
}

#[test]
fn defaults_from_global_config_flow_into_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobs.conf");
    fs::write(
        &path,
        "[clip]\ninput = a.mp4\noutput = b.mp4\n90 105\n",
    )
    .unwrap();

    let defaults = JobDefaults {
        crf: "28".to_string(),
        preset: "slow".to_string(),
        ..JobDefaults::default()
    };
    let jobs = load_jobs(&path, &defaults).unwrap();
    assert_eq!(jobs[0].crf, "28");
    assert_eq!(jobs[0].preset, "slow");
    assert_eq!(jobs[0].width, "1920");
}
