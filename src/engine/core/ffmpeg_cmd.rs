//! Turns a validated job plus a resolved encoder path into the exact
//! ffmpeg argument list. Pure: identical inputs yield identical lists.

use std::process::Command;

use super::types::VideoJob;
use crate::engine::hardware::{EncoderChoice, HwAccel};

/// libx264 speed/quality tradeoff baked into the software path only.
const X264_SPEED_PARAMS: &str = "ref=1:bframes=1:me=hex:subme=1";

/// Render device handed to ffmpeg on the VAAPI path.
const VAAPI_RENDER_DEVICE: &str = "/dev/dri/renderD128";

/// Build the full argument list for one job.
///
/// Order is fixed; see the module tests and snapshots. The output path is
/// always the terminal argument.
pub fn encode_args(job: &VideoJob, choice: &EncoderChoice) -> Vec<String> {
    let mut args: Vec<String> = vec!["-hide_banner".into(), "-y".into()];

    // Hardware-specific decode setup goes before the input.
    match choice.accel {
        HwAccel::Nvenc => {
            args.extend(
                ["-hwaccel", "cuda", "-hwaccel_output_format", "cuda"]
                    .map(String::from),
            );
            args.extend(["-avoid_negative_ts", "make_zero"].map(String::from));
        }
        HwAccel::Qsv => {
            args.extend(["-hwaccel", "qsv"].map(String::from));
        }
        HwAccel::Vaapi => {
            args.extend(["-hwaccel", "vaapi", "-hwaccel_device", VAAPI_RENDER_DEVICE].map(String::from));
        }
        HwAccel::Cpu => {}
    }

    args.push("-threads".into());
    args.push(if job.threads.is_empty() {
        "0".into()
    } else {
        job.threads.clone()
    });

    args.push("-i".into());
    args.push(job.input_path.to_string_lossy().into_owned());

    // Rate control for the hardware paths; libx264 takes -crf further down.
    match choice.accel {
        HwAccel::Nvenc => {
            args.extend(["-rc", "vbr"].map(String::from));
            args.push("-cq".into());
            args.push(job.crf.clone());
        }
        HwAccel::Qsv => {
            args.push("-global_quality".into());
            args.push(job.crf.clone());
        }
        HwAccel::Vaapi => {
            args.push("-qp".into());
            args.push(job.crf.clone());
        }
        HwAccel::Cpu => {}
    }

    args.push("-filter_complex".into());
    args.push(filter_graph(job));
    args.extend(["-map", "[v]", "-map", "[a]"].map(String::from));
    args.push("-c:v".into());
    args.push(choice.codec.to_string());

    match choice.accel {
        HwAccel::Cpu => {
            args.push("-crf".into());
            args.push(job.crf.clone());
            args.push("-preset".into());
            args.push(job.preset.clone());
            args.push("-x264-params".into());
            args.push(X264_SPEED_PARAMS.into());
        }
        HwAccel::Nvenc => {
            args.push("-preset".into());
            args.push(nvenc_preset(&job.preset).into());
        }
        HwAccel::Qsv => {
            args.extend(["-preset", "balanced"].map(String::from));
        }
        HwAccel::Vaapi => {
            args.extend(["-preset", "fast"].map(String::from));
        }
    }

    args.extend(["-c:a", "aac", "-b:a", "192k", "-movflags", "+faststart"].map(String::from));

    push_extra_args(&mut args, &job.extra_args);

    args.push(job.output_path.to_string_lossy().into_owned());
    args
}

/// Convenience wrapper producing a ready-to-run `Command`.
pub fn build_ffmpeg_cmd(job: &VideoJob, choice: &EncoderChoice) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(encode_args(job, choice));
    cmd
}

/// One scale/pad/fps/trim chain per segment for video, one atrim chain per
/// segment for audio, then a single concat joining them in list order.
pub fn filter_graph(job: &VideoJob) -> String {
    let mut filters = Vec::with_capacity(job.segments.len() * 2 + 1);
    let mut concat_pads = String::new();

    for (i, seg) in job.segments.iter().enumerate() {
        filters.push(format!(
            "[0:v]scale={w}:{h}:force_original_aspect_ratio=decrease,\
             pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,fps={fps},\
             trim=start={start}:end={end},setpts=PTS-STARTPTS[v{i}]",
            w = job.width,
            h = job.height,
            fps = job.fps,
            start = seg.start,
            end = seg.end,
        ));
        filters.push(format!(
            "[0:a]atrim=start={start}:end={end},asetpts=PTS-STARTPTS[a{i}]",
            start = seg.start,
            end = seg.end,
        ));
        concat_pads.push_str(&format!("[v{i}][a{i}]"));
    }

    filters.push(format!(
        "{concat_pads}concat=n={n}:v=1:a=1[v][a]",
        n = job.segments.len()
    ));

    filters.join(";")
}

/// libx264 preset names mapped to the NVENC p1-p7 scale. Unrecognized
/// presets land on p4.
pub fn nvenc_preset(preset: &str) -> &'static str {
    match preset {
        "ultrafast" => "p1",
        "superfast" => "p2",
        "veryfast" => "p3",
        "faster" => "p4",
        "fast" => "p5",
        "medium" => "p6",
        "slow" | "slower" | "veryslow" => "p7",
        _ => "p4",
    }
}

/// Render a program plus argument list the way it would be typed.
pub fn format_ffmpeg_cmd(program: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(program.to_string());
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

// Shell-style parsing so quoted strings with spaces survive; unbalanced
// quotes fall back to a plain whitespace split.
fn push_extra_args(args: &mut Vec<String>, extra: &str) {
    if extra.is_empty() {
        return;
    }

    if let Some(parsed) = shlex::split(extra) {
        args.extend(parsed);
    } else {
        args.extend(extra.split_whitespace().map(String::from));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JobDefaults;
    use crate::engine::core::Segment;

    fn job_with_segments(segments: Vec<Segment>) -> VideoJob {
        let mut job = VideoJob::with_defaults("test".to_string(), &JobDefaults::default());
        job.input_path = "in.mp4".into();
        job.output_path = "out.mp4".into();
        job.segments = segments;
        job
    }

    #[test]
    fn nvenc_preset_table() {
        assert_eq!(nvenc_preset("ultrafast"), "p1");
        assert_eq!(nvenc_preset("superfast"), "p2");
        assert_eq!(nvenc_preset("veryfast"), "p3");
        assert_eq!(nvenc_preset("faster"), "p4");
        assert_eq!(nvenc_preset("fast"), "p5");
        assert_eq!(nvenc_preset("medium"), "p6");
        assert_eq!(nvenc_preset("slow"), "p7");
        assert_eq!(nvenc_preset("slower"), "p7");
        assert_eq!(nvenc_preset("veryslow"), "p7");
        assert_eq!(nvenc_preset("placebo"), "p4");
        assert_eq!(nvenc_preset(""), "p4");
    }

    #[test]
    fn filter_graph_single_segment() {
        let job = job_with_segments(vec![Segment { start: 90, end: 105 }]);
        assert_eq!(
            filter_graph(&job),
            "[0:v]scale=1920:1080:force_original_aspect_ratio=decrease,\
             pad=1920:1080:(ow-iw)/2:(oh-ih)/2,fps=30,\
             trim=start=90:end=105,setpts=PTS-STARTPTS[v0];\
             [0:a]atrim=start=90:end=105,asetpts=PTS-STARTPTS[a0];\
             [v0][a0]concat=n=1:v=1:a=1[v][a]"
        );
    }

    #[test]
    fn filter_graph_preserves_segment_order() {
        let job = job_with_segments(vec![
            Segment { start: 300, end: 450 },
            Segment { start: 90, end: 105 },
        ]);
        let graph = filter_graph(&job);
        let first = graph.find("trim=start=300").unwrap();
        let second = graph.find("trim=start=90").unwrap();
        assert!(first < second, "segments must stay in insertion order");
        assert!(graph.ends_with("[v0][a0][v1][a1]concat=n=2:v=1:a=1[v][a]"));
    }

    #[test]
    fn quoted_extra_args_survive_splitting() {
        let mut args = Vec::new();
        push_extra_args(&mut args, "-metadata title=\"my clip\" -an");
        assert_eq!(args, vec!["-metadata", "title=my clip", "-an"]);
    }

    #[test]
    fn unbalanced_quotes_fall_back_to_whitespace_split() {
        let mut args = Vec::new();
        push_extra_args(&mut args, "-vf \"scale=640");
        assert_eq!(args, vec!["-vf", "\"scale=640"]);
    }

    #[test]
    fn empty_threads_becomes_auto() {
        let mut job = job_with_segments(vec![Segment { start: 0, end: 5 }]);
        job.threads = String::new();
        let args = encode_args(&job, &EncoderChoice::software());
        let idx = args.iter().position(|a| a == "-threads").unwrap();
        assert_eq!(args[idx + 1], "0");
    }
}
