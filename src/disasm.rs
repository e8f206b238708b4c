//! Linear disassembler over the supported opcode subset.

use crate::instructions::InstructionSet;
use crate::opcodes::{PUSH1, PUSH32};

pub fn disassemble(code: &[u8]) -> Vec<String> {
    let set = InstructionSet::new();
    let mut out = Vec::new();
    let mut pc = 0usize;
    while pc < code.len() {
        let op = code[pc];
        let mut line = format!("{:04x}: ", pc);
        if (PUSH1..=PUSH32).contains(&op) {
            let n = (op - PUSH1 + 1) as usize;
            let start = pc + 1;
            let end = (start + n).min(code.len());
            let imm = &code[start..end];
            line.push_str(&format!("PUSH{} 0x{}", n, hex::encode(imm)));
            pc = start + n;
        } else if let Some(inst) = set.get(op) {
            line.push_str(inst.name);
            pc += 1;
        } else {
            line.push_str(&format!("0x{:02x}", op));
            pc += 1;
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_names_and_push_immediates() {
        let code = hex::decode("600660070260005360016000f3").unwrap();
        let lines = disassemble(&code);
        assert_eq!(lines[0], "0000: PUSH1 0x06");
        assert_eq!(lines[1], "0002: PUSH1 0x07");
        assert_eq!(lines[2], "0004: MUL");
        assert_eq!(lines.last().unwrap(), "000c: RETURN");
    }

    #[test]
    fn unknown_bytes_render_as_hex() {
        let lines = disassemble(&[0xfe, 0x00]);
        assert_eq!(lines[0], "0000: 0xfe");
        assert_eq!(lines[1], "0001: STOP");
    }

    #[test]
    fn truncated_push_immediate() {
        // PUSH32 with only two operand bytes present
        let lines = disassemble(&[0x7f, 0xab, 0xcd]);
        assert_eq!(lines, vec!["0000: PUSH32 0xabcd"]);
    }
}
