pub mod fragment_buffer;
