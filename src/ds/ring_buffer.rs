#![allow(clippy::len_without_is_empty)]
use std::ops::Index;

/// A fixed-capacity ringbuffer that overwrites its oldest element once full
#[derive(Debug, Default, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    ix: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// **Panics** if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be positive");
        Self {
            buffer: Vec::with_capacity(capacity),
            ix: 0,
            capacity,
        }
    }

    /// Returns the number of stored elements
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Insert an element into the buffer, returning the element it overwrote, if any
    pub fn push(&mut self, item: T) -> Option<T> {
        let ix = self.ix;
        self.ix = (ix + 1) % self.capacity;
        if ix >= self.len() {
            self.buffer.push(item);
            None
        } else {
            Some(std::mem::replace(&mut self.buffer[ix], item))
        }
    }

    /// Get a slice view of the internal buffer, in storage order
    pub fn view(&self) -> &[T] {
        &self.buffer
    }
}

impl RingBuffer<f32> {
    /// Arithmetic mean of the stored values, `0` when empty
    pub fn mean(&self) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        self.buffer.iter().sum::<f32>() / self.len() as f32
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buffer[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ringbuffer_functional() {
        let mut buf = RingBuffer::new(4);
        assert_eq!(buf.len(), 0, "initialized empty");

        for i in 0..4 {
            assert_eq!(buf.push(i * 2), None, "nothing overwritten while filling");
        }

        assert!(buf.is_full(), "full after capacity pushes");
        assert_eq!(buf.view(), [0, 2, 4, 6], "contents correct");

        assert_eq!(buf.push(1), Some(0), "oldest element overwritten");
        buf.push(3);
        assert_eq!(buf.len(), 4, "length unchanged");
        assert_eq!(buf.view(), [1, 3, 4, 6], "contents overwritten correctly");
        assert_eq!(buf[1], 3, "indexing works");
    }

    #[test]
    fn mean_over_window() {
        let mut buf = RingBuffer::new(3);
        assert_eq!(buf.mean(), 0.0, "empty mean is zero");
        buf.push(1.0);
        assert_eq!(buf.mean(), 1.0, "mean over available values");
        buf.push(2.0);
        buf.push(3.0);
        buf.push(10.0);
        assert_eq!(buf.mean(), 5.0, "only the last three values count");
    }
}
