//! Small stateless bit helpers shared by the CPU and the peripherals.

/// Return whether bit `n` of `value` is set.
#[inline]
pub const fn test(value: u8, n: u8) -> bool {
    value & (1 << n) != 0
}

/// Return bit `n` of `value` as 0 or 1.
#[inline]
pub const fn get(value: u8, n: u8) -> u8 {
    (value >> n) & 1
}

#[inline]
pub const fn set(value: u8, n: u8) -> u8 {
    value | (1 << n)
}

#[inline]
pub const fn reset(value: u8, n: u8) -> u8 {
    value & !(1 << n)
}

/// High byte of a 16-bit word.
#[inline]
pub const fn hi(word: u16) -> u8 {
    (word >> 8) as u8
}

/// Low byte of a 16-bit word.
#[inline]
pub const fn lo(word: u16) -> u8 {
    word as u8
}

#[inline]
pub const fn join(hi: u8, lo: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// Whether adding `a + b + carry` carries out of bit 3.
#[inline]
pub const fn half_carry_add(a: u8, b: u8, carry: u8) -> bool {
    (a & 0x0F) + (b & 0x0F) + carry > 0x0F
}

/// Whether `a - b - carry` borrows from bit 4.
#[inline]
pub const fn half_borrow_sub(a: u8, b: u8, carry: u8) -> bool {
    (a & 0x0F) < (b & 0x0F) + carry
}

/// Whether adding two words carries out of bit 11.
#[inline]
pub const fn half_carry_add16(a: u16, b: u16) -> bool {
    (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF
}
