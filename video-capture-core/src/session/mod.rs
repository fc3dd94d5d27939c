pub mod recording;
mod stream_guard;
