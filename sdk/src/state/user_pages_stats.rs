use {super::AccountData, arrayref::array_ref};

/// Free user slots left in each users page, indexed by page id.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPagesStats {
    pub free_slots: Vec<u16>,
}

impl UserPagesStats {
    /// Page with the most free slots; the lowest page id wins a tie. `None`
    /// when there are no pages.
    pub fn best_page(&self) -> Option<u16> {
        let mut best: Option<(usize, u16)> = None;
        for (page_id, &free) in self.free_slots.iter().enumerate() {
            if best.map_or(true, |(_, most)| free > most) {
                best = Some((page_id, free));
            }
        }
        best.map(|(page_id, _)| page_id as u16)
    }
}

impl AccountData for UserPagesStats {
    const MIN_LEN: usize = 0;

    fn required_len(src: &[u8]) -> usize {
        src.len() + src.len() % 2
    }

    fn packed_len(&self) -> usize {
        self.free_slots.len() * 2
    }

    fn unpack_from_slice(src: &[u8]) -> Self {
        let free_slots = src
            .chunks_exact(2)
            .map(|count| u16::from_le_bytes(*array_ref![count, 0, 2]))
            .collect();
        Self { free_slots }
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        for (dst, free) in dst.chunks_exact_mut(2).zip(&self.free_slots) {
            dst.copy_from_slice(&free.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::error::DecodeError};

    #[test]
    fn test_unpack() {
        let stats = UserPagesStats::unpack(&[3, 0, 0, 1, 255, 255]).unwrap();
        assert_eq!(stats.free_slots, vec![3, 256, u16::MAX]);
        assert!(UserPagesStats::unpack(&[]).unwrap().free_slots.is_empty());
    }

    #[test]
    fn test_odd_length() {
        assert_eq!(
            UserPagesStats::unpack(&[1, 0, 2]),
            Err(DecodeError::BufferTooShort {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_best_page() {
        let stats = |free_slots: Vec<u16>| UserPagesStats { free_slots };
        assert_eq!(stats(vec![]).best_page(), None);
        assert_eq!(stats(vec![0, 0]).best_page(), Some(0));
        assert_eq!(stats(vec![5, 9, 2, 9]).best_page(), Some(1));
        assert_eq!(stats(vec![1, 2, 3]).best_page(), Some(2));
    }
}
