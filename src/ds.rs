pub mod action_table;
pub mod ring_buffer;

pub use action_table::ActionTable;
pub use ring_buffer::RingBuffer;
