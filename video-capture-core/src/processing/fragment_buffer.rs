/// One chunk of encoded media as received from the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Arrival position within the current session, starting at 0.
    pub sequence: u64,
    pub data: Vec<u8>,
}

/// Ordered, append-only store of encoder fragments for one session.
///
/// Unlike a ring buffer this never drops data: every fragment is kept,
/// including zero-length ones, until the next session clears it.
#[derive(Debug, Default)]
pub struct FragmentBuffer {
    fragments: Vec<Fragment>,
    next_sequence: u64,
    total_bytes: usize,
}

impl FragmentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment after all previously received ones.
    pub fn push(&mut self, data: Vec<u8>) {
        self.total_bytes += data.len();
        self.fragments.push(Fragment {
            sequence: self.next_sequence,
            data,
        });
        self.next_sequence += 1;
    }

    /// Concatenate every fragment, in arrival order.
    ///
    /// Returns `None` when no fragment has been received.
    pub fn assemble(&self) -> Option<Vec<u8>> {
        if self.fragments.is_empty() {
            return None;
        }
        let mut bytes = Vec::with_capacity(self.total_bytes);
        for fragment in &self.fragments {
            bytes.extend_from_slice(&fragment.data);
        }
        Some(bytes)
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Number of fragments received.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Total payload size across all fragments.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Drop all fragments and restart sequence numbering.
    pub fn clear(&mut self) {
        self.fragments.clear();
        self.next_sequence = 0;
        self.total_bytes = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_concatenates_in_order() {
        let mut buf = FragmentBuffer::new();
        buf.push(vec![1, 2]);
        buf.push(vec![3]);
        buf.push(vec![4, 5, 6]);

        assert_eq!(buf.len(), 3);
        assert_eq!(buf.total_bytes(), 6);
        assert_eq!(buf.assemble(), Some(vec![1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn empty_buffer_assembles_to_none() {
        let buf = FragmentBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.assemble(), None);
    }

    #[test]
    fn zero_length_fragments_are_kept() {
        let mut buf = FragmentBuffer::new();
        buf.push(Vec::new());

        assert_eq!(buf.len(), 1);
        assert_eq!(buf.assemble(), Some(Vec::new()));
    }

    #[test]
    fn sequences_follow_arrival() {
        let mut buf = FragmentBuffer::new();
        buf.push(b"a".to_vec());
        buf.push(b"b".to_vec());

        let sequences: Vec<u64> = buf.fragments().iter().map(|f| f.sequence).collect();
        assert_eq!(sequences, vec![0, 1]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut buf = FragmentBuffer::new();
        buf.push(vec![9; 10]);
        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(buf.total_bytes(), 0);
        assert_eq!(buf.assemble(), None);

        buf.push(vec![1]);
        assert_eq!(buf.fragments()[0].sequence, 0);
    }

    #[test]
    fn assemble_does_not_consume() {
        let mut buf = FragmentBuffer::new();
        buf.push(vec![7, 8]);

        assert_eq!(buf.assemble(), buf.assemble());
        assert_eq!(buf.len(), 1);
    }
}
