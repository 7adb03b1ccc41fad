mod ffmpeg_cmd;
mod ffmpeg_info;
mod types;

pub use ffmpeg_cmd::{
    build_ffmpeg_cmd, encode_args, filter_graph, format_ffmpeg_cmd, nvenc_preset,
};
pub use ffmpeg_info::{ffmpeg_version, ffprobe_version, parse_ffprobe_duration, probe_duration};
pub use types::{Segment, VideoJob};
