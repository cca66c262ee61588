//! Register read/write commands

use std::fmt::Write as _;

use vl53l7cx_core::bus::I2cBus;
use vl53l7cx_core::delay::Delay;
use vl53l7cx_core::reset::ResetLine;
use vl53l7cx_platform::Platform;

/// Bytes per hex dump line
const DUMP_WIDTH: usize = 16;

/// Read `len` bytes from `reg` on, optionally swapping each 4-byte group
pub fn read_registers<B, R, D>(
    platform: &mut Platform<B, R, D>,
    reg: u16,
    len: u16,
    swap: bool,
) -> Result<Vec<u8>, Box<dyn std::error::Error>>
where
    B: I2cBus,
    R: ResetLine,
    D: Delay,
{
    if u32::from(reg) + u32::from(len) > 0x1_0000 {
        return Err(format!(
            "0x{:04X} + {} bytes runs past the end of the register space",
            reg, len
        )
        .into());
    }

    let mut data = vec![0u8; len as usize];
    platform.rd_multi(reg, &mut data)?;
    if swap {
        platform.swap_buffer(&mut data);
    }
    Ok(data)
}

/// Format `data` as a hex dump with register indices starting at `reg`
pub fn hex_dump(reg: u16, data: &[u8]) -> String {
    let mut out = String::new();
    for (i, chunk) in data.chunks(DUMP_WIDTH).enumerate() {
        let index = reg as usize + i * DUMP_WIDTH;
        let _ = write!(out, "{:04X}:", index);
        for byte in chunk {
            let _ = write!(out, " {:02X}", byte);
        }
        out.push('\n');
    }
    out
}

/// Run the read command
pub fn run_read<B, R, D>(
    platform: &mut Platform<B, R, D>,
    reg: u16,
    len: u16,
    swap: bool,
) -> Result<(), Box<dyn std::error::Error>>
where
    B: I2cBus,
    R: ResetLine,
    D: Delay,
{
    let data = read_registers(platform, reg, len, swap)?;
    print!("{}", hex_dump(reg, &data));
    Ok(())
}

/// Run the write command
pub fn run_write<B, R, D>(
    platform: &mut Platform<B, R, D>,
    reg: u16,
    bytes: &[u8],
) -> Result<(), Box<dyn std::error::Error>>
where
    B: I2cBus,
    R: ResetLine,
    D: Delay,
{
    platform.wr_multi(reg, bytes)?;
    println!("Wrote {} bytes at 0x{:04X}", bytes.len(), reg);
    Ok(())
}
