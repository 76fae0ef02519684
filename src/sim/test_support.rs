//! Test helpers shared by the sim tests

use rand::RngCore;

/// RNG that returns the same word forever
///
/// `FixedRng::LOW` makes every uniform draw 0.0: bosses always spawn, enemies
/// enter at the top-left corner. `FixedRng::HIGH` makes every draw just under
/// 1.0: bosses never spawn. Either way the constant wiggle pushes enemies
/// away from the writer, so no bites happen unless a test asks for one.
/// `FixedRng::MID` draws exactly 0.5: no bosses, enemies enter at the middle
/// of the bottom edge and fly straight at the writer with zero wiggle.
#[derive(Debug, Clone, Copy)]
pub struct FixedRng(pub u32);

impl FixedRng {
    pub const LOW: FixedRng = FixedRng(0);
    pub const HIGH: FixedRng = FixedRng(u32::MAX);
    pub const MID: FixedRng = FixedRng(0x8000_0000);
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.0) << 32) | u64::from(self.0)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let bytes = self.0.to_le_bytes();
        for (i, byte) in dst.iter_mut().enumerate() {
            *byte = bytes[i % 4];
        }
    }
}
