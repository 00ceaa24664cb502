use crate::word::read_u32;
use crate::DocError;

const POSITION_SIZE: usize = 4;

/// A PLC: `n + 1` ascending u32 positions followed by `n` fixed-size data elements.
///
/// Element `i` covers positions `[positions[i], positions[i + 1])`. The same layout is used with
/// character positions (piece table, bookmarks) and stream offsets (bin tables).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plc<T> {
    positions: Vec<u32>,
    data: Vec<T>,
}

impl<T> Plc<T> {
    /// Parse a PLC whose data elements are `element_size` bytes each.
    ///
    /// The byte length must be exactly `4 + n * (4 + element_size)`.
    pub(crate) fn parse(
        bytes: &[u8],
        element_size: usize,
        structure: &'static str,
        mut decode: impl FnMut(&[u8]) -> Result<T, DocError>,
    ) -> Result<Self, DocError> {
        let stride = POSITION_SIZE + element_size;
        let body = bytes.len().checked_sub(POSITION_SIZE).ok_or_else(|| {
            DocError::corrupted(structure, format!("{} bytes is too short", bytes.len()))
        })?;
        if body % stride != 0 {
            return Err(DocError::corrupted(
                structure,
                format!(
                    "{} bytes is not a whole number of {element_size}-byte entries",
                    bytes.len()
                ),
            ));
        }
        let n = body / stride;

        let mut positions = Vec::new();
        positions
            .try_reserve_exact(n + 1)
            .map_err(|_| DocError::corrupted(structure, "allocation failed (positions)"))?;
        for i in 0..=n {
            let pos = read_u32(bytes, i * POSITION_SIZE)
                .ok_or_else(|| DocError::corrupted(structure, "truncated position array"))?;
            if let Some(&prev) = positions.last() {
                if pos < prev {
                    return Err(DocError::corrupted(
                        structure,
                        format!("position {i} ({pos}) is less than its predecessor ({prev})"),
                    ));
                }
            }
            positions.push(pos);
        }

        let data_start = (n + 1) * POSITION_SIZE;
        let mut data = Vec::new();
        data.try_reserve_exact(n)
            .map_err(|_| DocError::corrupted(structure, "allocation failed (data)"))?;
        for i in 0..n {
            let start = data_start + i * element_size;
            let element = bytes
                .get(start..start + element_size)
                .ok_or_else(|| DocError::corrupted(structure, "truncated data array"))?;
            data.push(decode(element)?);
        }

        Ok(Self { positions, data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The `[start, end)` range and data of element `index`.
    pub fn get(&self, index: usize) -> Option<(u32, u32, &T)> {
        let data = self.data.get(index)?;
        Some((self.positions[index], self.positions[index + 1], data))
    }

    /// Index of the element whose range contains `pos`.
    ///
    /// Returns `None` when `pos` is before the first position or at/after the last one.
    pub fn find(&self, pos: u32) -> Option<usize> {
        let last = *self.positions.last()?;
        if pos >= last {
            return None;
        }
        // Largest i with positions[i] <= pos.
        let after = self.positions.partition_point(|&p| p <= pos);
        after.checked_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> + '_ {
        (0..self.data.len()).filter_map(move |i| self.get(i))
    }
}
