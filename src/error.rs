// One error type for the whole library.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Hand tracker error: {0}")]
    Tracker(String), // Starting or talking to the landmark helper failed
    #[error("Unknown color: {0}")]
    UnknownColor(String), // External command named a color not in the palette
    #[error("Config error: {0}")]
    Config(String), // Reading/writing the config file failed
}
