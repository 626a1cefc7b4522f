use std::fmt;

/// Closed set of commands and reports understood by the recorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum JobKind {
    /// Start capturing a room to a file.
    StartRecording = 0,
    /// Stop the room's file recording.
    StopRecording = 1,
    /// Start relaying a room to an RTMP endpoint.
    StartRtmp = 2,
    /// Stop the room's RTMP relay.
    StopRtmp = 3,
    /// Stop every job of the room.
    Stop = 4,
    /// Report: a recording job ended.
    EndRecording = 5,
    /// Report: an RTMP job ended.
    EndRtmp = 6,
    /// Report: a recording file was finalized.
    RecordingProceeded = 7,
}

impl JobKind {
    /// Whether this kind launches a capture.
    pub fn is_start(self) -> bool {
        matches!(self, JobKind::StartRecording | JobKind::StartRtmp)
    }

    /// Start kinds addressed by a stop kind. Empty for anything else.
    ///
    /// A job is addressed by the kind that started it, so stopping looks up
    /// the start kind's registry key.
    pub fn stop_targets(self) -> &'static [JobKind] {
        match self {
            JobKind::StopRecording => &[JobKind::StartRecording],
            JobKind::StopRtmp => &[JobKind::StartRtmp],
            JobKind::Stop => &[JobKind::StartRecording, JobKind::StartRtmp],
            _ => &[],
        }
    }

    /// Kind reported upstream when a job of this kind terminates.
    pub fn end_kind(self) -> JobKind {
        match self {
            JobKind::StartRtmp => JobKind::EndRtmp,
            _ => JobKind::EndRecording,
        }
    }

    /// Stable upper-case name, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            JobKind::StartRecording => "START_RECORDING",
            JobKind::StopRecording => "STOP_RECORDING",
            JobKind::StartRtmp => "START_RTMP",
            JobKind::StopRtmp => "STOP_RTMP",
            JobKind::Stop => "STOP",
            JobKind::EndRecording => "END_RECORDING",
            JobKind::EndRtmp => "END_RTMP",
            JobKind::RecordingProceeded => "RECORDING_PROCEEDED",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
