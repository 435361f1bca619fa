//! Shell-script stand-ins for ffmpeg/ffprobe.
//!
//! Both scripts decide what to do from the *contents* of the input file:
//! `probe-fail` makes ffprobe exit 1, `no-duration` makes it print `N/A`,
//! `encode-fail` makes ffmpeg exit 1. Otherwise ffprobe reports 10 seconds and
//! ffmpeg prints a few stats lines to stderr and writes `encoded` to the output.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use tempfile::TempDir;
use uuid::Uuid;

use crate::common::upload::TempUpload;
use crate::config::settings::{parse_origins, AppConfig, DEFAULT_CORS_ORIGINS};
use crate::infrastructure::media::MediaTools;
use crate::state::AppState;

const FAKE_FFPROBE: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then echo "ffprobe version fake"; exit 0; fi
for arg in "$@"; do input="$arg"; done
case "$(cat "$input" 2>/dev/null)" in
  *probe-fail*) echo "probe failed" >&2; exit 1 ;;
  *no-duration*) echo "N/A" ;;
  *) echo "10.000000" ;;
esac
"#;

const FAKE_FFMPEG: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then echo "ffmpeg version fake"; exit 0; fi
prev=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then input="$arg"; fi
  prev="$arg"
done
out="$prev"
case "$(cat "$input" 2>/dev/null)" in
  *encode-fail*) echo "$input: Invalid data found when processing input" >&2; exit 1 ;;
esac
echo "  Duration: 00:00:10.00, start: 0.000000, bitrate: 9000 kb/s" >&2
for t in 00:00:02.50 00:00:05.00 00:00:05.01 00:00:10.00; do
  printf 'frame=   60 fps= 30 q=28.0 size=     256kB time=%s bitrate=N/A speed=1x\r' "$t" >&2
  sleep 0.05
done
printf 'encoded' > "$out"
"#;

// Written once per test binary: executing a script while another thread still
// holds it open for writing fails with ETXTBSY.
static SCRIPTS: LazyLock<TempDir> = LazyLock::new(|| {
    let dir = tempfile::Builder::new()
        .prefix("desqueeze-tools")
        .tempdir()
        .expect("create scripts dir");
    write_script(&dir.path().join("ffprobe"), FAKE_FFPROBE);
    write_script(&dir.path().join("ffmpeg"), FAKE_FFMPEG);
    dir
});

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write fake tool");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).expect("chmod fake tool");
}

pub struct FakeTools {
    root: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create test dir");
        std::fs::create_dir_all(root.path().join("uploads")).expect("create uploads dir");
        std::fs::create_dir_all(root.path().join("downloads")).expect("create downloads dir");
        Self { root }
    }

    pub fn dir(&self) -> &Path {
        self.root.path()
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir().join("uploads")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.dir().join("downloads")
    }

    pub fn media_tools(&self) -> MediaTools {
        MediaTools::new(SCRIPTS.path().join("ffmpeg"), SCRIPTS.path().join("ffprobe"))
    }

    pub fn config(&self) -> AppConfig {
        AppConfig {
            server_port: 3001,
            ffmpeg_path: SCRIPTS.path().join("ffmpeg"),
            ffprobe_path: SCRIPTS.path().join("ffprobe"),
            upload_dir: self.upload_dir(),
            downloads_dir: self.downloads_dir(),
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS).expect("default origins"),
            max_upload_bytes: 1024 * 1024,
        }
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.config(), self.media_tools())
    }

    /// A parked upload whose bytes are `contents`.
    pub fn temp_upload(&self, contents: &str) -> TempUpload {
        let path = self.upload_dir().join(format!("upload-{}", Uuid::new_v4().simple()));
        std::fs::write(&path, contents).expect("write temp upload");
        TempUpload::adopt(path)
    }

    pub fn upload_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.upload_dir())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }
}
