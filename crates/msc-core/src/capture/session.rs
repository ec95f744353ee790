//! One open / capture / close cycle over a backend

use tracing::{debug, warn};

use super::{Frame, ScreenCapture};
use crate::error::MscResult;

/// Runs one capture session and hands the frame to `finish`
///
/// `close` runs on every exit path: after a failed `open`, a failed
/// `capture`, a failed `finish`, and on success. A failing `close` is logged
/// and never replaces the session's own result.
pub async fn run_session<T, F>(backend: &mut dyn ScreenCapture, finish: F) -> MscResult<T>
where
    F: FnOnce(Frame) -> MscResult<T>,
{
    let method = backend.method();
    debug!("{}: opening backend", method);

    let result = match backend.open().await {
        Ok(()) => match backend.capture().await {
            Ok(frame) => {
                let (width, height) = frame.dimensions();
                debug!("{}: captured {}x{} frame", method, width, height);
                finish(frame)
            }
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = backend.close().await {
        warn!("{}: failed to release backend: {}", method, e);
    }

    result
}
