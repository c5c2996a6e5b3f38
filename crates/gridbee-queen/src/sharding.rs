//! Contiguous payload division for job dispatch.

/// Split a payload into `num_blocks` contiguous segments.
///
/// The block size is `ceil(len / num_blocks)`; the last segment may be
/// shorter than the others, and segments past the end of the payload are
/// empty strings rather than errors. Concatenating the returned segments in
/// order reconstructs the payload exactly. A requested count of zero is
/// treated as one.
pub fn divide(payload: &str, num_blocks: usize) -> Vec<String> {
    let num_blocks = num_blocks.max(1);
    let block_size = payload.len().div_ceil(num_blocks);

    let mut blocks = Vec::with_capacity(num_blocks);
    let mut start = 0usize;
    for index in 0..num_blocks {
        let end = if index + 1 == num_blocks {
            payload.len()
        } else {
            let mut end = (start + block_size).min(payload.len());
            // Payloads are base64 in practice; stay on a char boundary if not
            while !payload.is_char_boundary(end) {
                end -= 1;
            }
            end
        };
        blocks.push(payload[start..end].to_string());
        start = end;
    }
    blocks
}
