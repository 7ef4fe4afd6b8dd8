//! FNV-1a hashing used for graph content identity and stable tie-break hashes.

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Clone, Copy, Debug)]
pub struct Fnv1a64 {
    hash: u64,
}

impl Default for Fnv1a64 {
    fn default() -> Self { Self { hash: FNV_OFFSET } }
}

impl Fnv1a64 {
    pub fn new() -> Self { Self::default() }

    pub fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.hash ^= *b as u64;
            self.hash = self.hash.wrapping_mul(FNV_PRIME);
        }
    }

    pub fn write_u32(&mut self, v: u32) { self.write(&v.to_le_bytes()); }
    pub fn write_u64(&mut self, v: u64) { self.write(&v.to_le_bytes()); }
    pub fn write_f64(&mut self, v: f64) { self.write(&v.to_bits().to_le_bytes()); }

    pub fn write_opt_f64(&mut self, v: Option<f64>) {
        match v {
            Some(x) => { self.write(&[1]); self.write_f64(x); }
            None => self.write(&[0]),
        }
    }

    pub fn finish(&self) -> u64 { self.hash }
}

/// Stable 64-bit hash of a city id; identical across runs and platforms.
pub fn stable_id_hash(id: u32) -> u64 {
    let mut h = Fnv1a64::new();
    h.write_u32(id);
    h.finish()
}
