use ad7746_hal::EvalBoard;
use ad7746_hal::registers::Register;
use anyhow::Context;

pub(crate) fn print_status(board: &EvalBoard) -> anyhow::Result<()> {
    let status = board.status().context("failed to read the status register")?;
    println!("status: {status}");
    println!("  ready: {}", status.is_ready());
    println!("  capacitance pending: {}", status.capacitance_pending());
    println!(
        "  voltage/temperature pending: {}",
        status.voltage_temperature_pending()
    );
    println!("  excitation fault: {}", status.excitation_fault());
    Ok(())
}

pub(crate) fn print_dump(board: &EvalBoard) -> anyhow::Result<()> {
    let registers = board
        .dump_registers()
        .context("failed to read the register file")?;
    for (register, value) in registers {
        println!("{}", dump_line(register, value));
    }
    Ok(())
}

fn dump_line(register: Register, value: u8) -> String {
    format!(
        "{:#04x}  {:<14} {value:#04x}  {value:08b}",
        register.address(),
        format!("{register:?}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_line_layout() {
        assert_eq!(
            dump_line(Register::Configuration, 0xF9),
            "0x0a  Configuration  0xf9  11111001"
        );
        assert_eq!(dump_line(Register::Status, 0x07), "0x00  Status         0x07  00000111");
    }
}
