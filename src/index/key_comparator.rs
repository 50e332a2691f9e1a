use std::cmp::Ordering;
use std::fmt;

/// Opaque fixed-width index key. The tree stores keys of widths 4, 8,
/// 16, 32 and 64 bytes; any width compiles.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GenericKey<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> GenericKey<N> {
    pub fn zeroed() -> Self {
        Self { data: [0u8; N] }
    }

    /// Builds a key from up to `N` bytes; shorter input is zero-padded.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut data = [0u8; N];
        let len = bytes.len().min(N);
        data[..len].copy_from_slice(&bytes[..len]);
        Self { data }
    }

    /// Encodes an integer big-endian so that bytewise order matches
    /// numeric order.
    pub fn from_u64(value: u64) -> Self {
        let mut data = [0u8; N];
        let be = value.to_be_bytes();
        let take = N.min(8);
        data[N - take..].copy_from_slice(&be[8 - take..]);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> fmt::Debug for GenericKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericKey{:?}", &self.data)
    }
}

/// Total order over fixed-width keys, yielding the usual tri-valued
/// result.
pub trait KeyComparator<const N: usize>: Send + Sync {
    fn compare(&self, a: &GenericKey<N>, b: &GenericKey<N>) -> Ordering;
}

/// Bytewise comparator. Combined with `GenericKey::from_u64` this
/// orders integer keys numerically.
pub struct GenericComparator<const N: usize>;

impl<const N: usize> KeyComparator<N> for GenericComparator<N> {
    fn compare(&self, a: &GenericKey<N>, b: &GenericKey<N>) -> Ordering {
        a.as_bytes().cmp(b.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u64_orders_numerically() {
        let cmp = GenericComparator::<8>;
        let small = GenericKey::<8>::from_u64(5);
        let big = GenericKey::<8>::from_u64(1000);

        assert_eq!(cmp.compare(&small, &big), Ordering::Less);
        assert_eq!(cmp.compare(&big, &small), Ordering::Greater);
        assert_eq!(cmp.compare(&small, &small), Ordering::Equal);
    }

    #[test]
    fn test_narrow_width_keys() {
        let cmp = GenericComparator::<4>;
        let a = GenericKey::<4>::from_u64(3);
        let b = GenericKey::<4>::from_u64(200_000);
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_from_bytes_zero_pads() {
        let key = GenericKey::<16>::from_bytes(b"abc");
        assert_eq!(&key.as_bytes()[..3], b"abc");
        assert!(key.as_bytes()[3..].iter().all(|&b| b == 0));
    }
}
