use std::collections::VecDeque;

/// A fixed-capacity ring buffer backed by VecDeque.
/// When full, pushing a new element automatically drops the oldest one.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Push an element. If at capacity, the oldest element is dropped and returned.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.buf.len() >= self.capacity {
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(item);
        evicted
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.buf.retain(keep);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.buf.iter()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ringbuffer_capacity() {
        let mut rb = RingBuffer::new(3);
        rb.push(1);
        rb.push(2);
        rb.push(3);
        assert_eq!(rb.len(), 3);
        assert_eq!(rb.push(4), Some(1));
        assert_eq!(rb.len(), 3);
        let items: Vec<_> = rb.iter().copied().collect();
        assert_eq!(items, vec![2, 3, 4]);
    }

    #[test]
    fn test_ringbuffer_retain() {
        let mut rb = RingBuffer::new(5);
        for i in 0..5 {
            rb.push(i);
        }
        rb.retain(|v| v % 2 == 0);
        let items: Vec<_> = rb.iter().copied().collect();
        assert_eq!(items, vec![0, 2, 4]);
    }

    #[test]
    fn test_ringbuffer_zero_capacity_keeps_one() {
        let mut rb = RingBuffer::new(0);
        rb.push('a');
        rb.push('b');
        assert_eq!(rb.len(), 1);
        assert!(!rb.is_empty());
    }
}
