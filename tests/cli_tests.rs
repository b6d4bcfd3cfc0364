use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Run the binary in an empty directory so no stray joinx.toml is picked up
fn joiner(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("joiner").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("JOINX_LOG_LEVEL")
        .env("FFPROBE_PATH", "/nonexistent/ffprobe")
        .env("FFMPEG_PATH", "/nonexistent/ffmpeg");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    joiner(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("concat").and(predicate::str::contains("mix")));
}

#[test]
fn test_check_needs_two_inputs() {
    let dir = TempDir::new().unwrap();
    joiner(&dir)
        .args(["check", "one.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least 2 inputs are required, got 1"));
}

#[test]
fn test_mix_rejects_loud_volume_before_probing() {
    let dir = TempDir::new().unwrap();
    joiner(&dir)
        .args(["mix", "--video", "v.mp4", "--audio", "a.mp3", "-o", "out.mp4", "--audio-volume", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid audio_volume: 1.5"))
        .stderr(predicate::str::contains("Probe failed").not());
}

#[test]
fn test_concat_rejects_bad_resolution() {
    let dir = TempDir::new().unwrap();
    joiner(&dir)
        .args(["concat", "a.mp4", "b.mp4", "-o", "out.mp4", "--resolution", "wide"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid resolution"));
}

#[test]
fn test_unknown_join_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    joiner(&dir)
        .args(["concat", "a.mp4", "b.mp4", "-o", "out.mp4", "--mode", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid join mode"));
}

#[test]
fn test_missing_ffprobe_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.mp4"), b"not really a video").unwrap();
    std::fs::write(dir.path().join("b.mp4"), b"not really a video").unwrap();
    joiner(&dir)
        .args(["check", "a.mp4", "b.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("probe tool failed"));
}

#[test]
fn test_concat_rejects_bad_bitrate_before_inspecting() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.mp4"), b"not really a video").unwrap();
    std::fs::write(dir.path().join("b.mp4"), b"not really a video").unwrap();
    joiner(&dir)
        .args(["concat", "a.mp4", "b.mp4", "-o", "out.mp4", "--video-bitrate", "fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid video_bitrate: fast"))
        .stderr(predicate::str::contains("Failed to start").not());
}

#[test]
fn test_mix_rejects_bad_audio_codec() {
    let dir = TempDir::new().unwrap();
    joiner(&dir)
        .args(["mix", "--video", "v.mp4", "--audio", "a.mp3", "-o", "out.mp4", "--audio-codec", "lib opus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid audio_codec: lib opus"));
}

#[test]
fn test_doctor_reports_missing_tools() {
    let dir = TempDir::new().unwrap();
    joiner(&dir)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("ffmpeg: unavailable"))
        .stdout(predicate::str::contains("ffprobe: unavailable"))
        .stderr(predicate::str::contains("Required tools are not usable: ffmpeg, ffprobe"));
}

#[cfg(unix)]
#[test]
fn test_doctor_prints_tool_versions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    for name in ["ffmpeg", "ffprobe"] {
        let path = dir.path().join(format!("fake-{}", name));
        std::fs::write(&path, format!("#!/bin/sh\necho '{} version 6.1.1'\n", name)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    joiner(&dir)
        .env("FFMPEG_PATH", dir.path().join("fake-ffmpeg"))
        .env("FFPROBE_PATH", dir.path().join("fake-ffprobe"))
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg: ffmpeg version 6.1.1"))
        .stdout(predicate::str::contains("ffprobe: ffprobe version 6.1.1"));
}
