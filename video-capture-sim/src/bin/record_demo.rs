use std::sync::Arc;

use video_capture_core::{
    ArtifactMetadata, CaptureError, RecordingSession, RecordingState, SessionDelegate,
};
use video_capture_sim::{EncoderOptions, SimulatedCamera, SimulatedEncoderFactory};

/// Delegate that forwards session events to the log.
struct LogDelegate;

impl SessionDelegate for LogDelegate {
    fn on_state_changed(&self, state: &RecordingState) {
        log::info!("state: {}", state.as_str());
    }

    fn on_error(&self, error: &CaptureError) {
        log::error!("capture error: {}", error);
    }

    fn on_artifact_created(&self, metadata: &ArtifactMetadata) {
        match serde_json::to_string(metadata) {
            Ok(json) => log::info!("artifact: {}", json),
            Err(e) => log::warn!("failed to serialize artifact metadata: {}", e),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let encoders = SimulatedEncoderFactory::with_options(EncoderOptions {
        final_fragment: Some(b"[tail]".to_vec()),
        ..Default::default()
    });
    let encoder = encoders.probe();
    let camera = SimulatedCamera::new();
    let camera_probe = camera.probe();

    let mut session = RecordingSession::new(camera, encoders);
    session.set_delegate(Arc::new(LogDelegate));

    session.start().await;
    if !session.is_recording() {
        log::error!("could not start recording: {:?}", session.last_error());
        return;
    }

    encoder.emit(b"[frame-1]".to_vec());
    encoder.emit(b"[frame-2]".to_vec());
    session.pause();
    encoder.emit(b"[dropped-while-paused]".to_vec());
    session.resume();
    encoder.emit(b"[frame-3]".to_vec());
    session.process_events();

    session.stop();
    session.wait_for_stop().await;
    log::info!(
        "stopped after {:.3}s, {} fragments, {} tracks stopped",
        session.recorded_duration().as_secs_f64(),
        session.fragment_count(),
        camera_probe.tracks_stopped()
    );

    let Some(reference) = session.complete() else {
        log::warn!("nothing was recorded");
        return;
    };
    if let Some(artifact) = session.artifacts().resolve(&reference) {
        println!(
            "{} {} {} bytes: {}",
            reference,
            artifact.media_type(),
            artifact.len(),
            String::from_utf8_lossy(artifact.bytes())
        );
    }
    session.artifacts().revoke(&reference);
}
