/// A decoded CHIP-8 instruction with its operands pulled out of the opcode.
///
/// Field names follow the usual opcode notation: `x` and `y` are register
/// indices, `kk` an immediate byte, `n` a nibble and `address` the 12-bit
/// `nnn` operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1nnn
    Jump { address: u16 },
    /// 2nnn
    Call { address: u16 },
    /// 3xkk
    SkipIfEqual { x: u8, kk: u8 },
    /// 4xkk
    SkipIfNotEqual { x: u8, kk: u8 },
    /// 5xy0
    SkipIfRegistersEqual { x: u8, y: u8 },
    /// 6xkk
    LoadImmediate { x: u8, kk: u8 },
    /// 7xkk
    AddImmediate { x: u8, kk: u8 },
    /// 8xy0
    Copy { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddWithCarry { x: u8, y: u8 },
    /// 8xy5
    Subtract { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubtractReversed { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipIfRegistersNotEqual { x: u8, y: u8 },
    /// Annn
    LoadIndex { address: u16 },
    /// Bnnn
    JumpWithOffset { address: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipIfKeyPressed { x: u8 },
    /// ExA1
    SkipIfKeyNotPressed { x: u8 },
    /// Fx07
    LoadDelayTimer { x: u8 },
    /// Fx0A
    WaitForKey { x: u8 },
    /// Fx15
    SetDelayTimer { x: u8 },
    /// Fx18
    SetSoundTimer { x: u8 },
    /// Fx1E
    AddToIndex { x: u8 },
    /// Fx29
    LoadFontGlyph { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegisters { x: u8 },
    /// Fx65
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Decodes one opcode word, or `None` if it matches no instruction.
    ///
    /// Groups 5 and 9 only look at the high nibble; groups 0, E and F look at
    /// the low byte and group 8 at the low nibble.
    pub fn decode(opcode: u16) -> Option<Instruction> {
        let [byte_a, byte_b] = opcode.to_be_bytes();

        let nibble_0 = (byte_a & 0xF0) >> 4;
        let nibble_1 = byte_a & 0x0F;
        let nibble_2 = (byte_b & 0xF0) >> 4;
        let nibble_3 = byte_b & 0x0F;

        let address = opcode & 0x0FFF;
        let kk = byte_b;
        let x = nibble_1;
        let y = nibble_2;

        let instruction = match [nibble_0, nibble_1, nibble_2, nibble_3] {
            [0x0, _, 0xE, 0x0] => Instruction::ClearScreen,
            [0x0, _, 0xE, 0xE] => Instruction::Return,
            [0x1, _, _, _] => Instruction::Jump { address },
            [0x2, _, _, _] => Instruction::Call { address },
            [0x3, _, _, _] => Instruction::SkipIfEqual { x, kk },
            [0x4, _, _, _] => Instruction::SkipIfNotEqual { x, kk },
            [0x5, _, _, _] => Instruction::SkipIfRegistersEqual { x, y },
            [0x6, _, _, _] => Instruction::LoadImmediate { x, kk },
            [0x7, _, _, _] => Instruction::AddImmediate { x, kk },
            [0x8, _, _, 0x0] => Instruction::Copy { x, y },
            [0x8, _, _, 0x1] => Instruction::Or { x, y },
            [0x8, _, _, 0x2] => Instruction::And { x, y },
            [0x8, _, _, 0x3] => Instruction::Xor { x, y },
            [0x8, _, _, 0x4] => Instruction::AddWithCarry { x, y },
            [0x8, _, _, 0x5] => Instruction::Subtract { x, y },
            [0x8, _, _, 0x6] => Instruction::ShiftRight { x },
            [0x8, _, _, 0x7] => Instruction::SubtractReversed { x, y },
            [0x8, _, _, 0xE] => Instruction::ShiftLeft { x },
            [0x9, _, _, _] => Instruction::SkipIfRegistersNotEqual { x, y },
            [0xA, _, _, _] => Instruction::LoadIndex { address },
            [0xB, _, _, _] => Instruction::JumpWithOffset { address },
            [0xC, _, _, _] => Instruction::Random { x, kk },
            [0xD, _, _, n] => Instruction::Draw { x, y, n },
            [0xE, _, 0x9, 0xE] => Instruction::SkipIfKeyPressed { x },
            [0xE, _, 0xA, 0x1] => Instruction::SkipIfKeyNotPressed { x },
            [0xF, _, 0x0, 0x7] => Instruction::LoadDelayTimer { x },
            [0xF, _, 0x0, 0xA] => Instruction::WaitForKey { x },
            [0xF, _, 0x1, 0x5] => Instruction::SetDelayTimer { x },
            [0xF, _, 0x1, 0x8] => Instruction::SetSoundTimer { x },
            [0xF, _, 0x1, 0xE] => Instruction::AddToIndex { x },
            [0xF, _, 0x2, 0x9] => Instruction::LoadFontGlyph { x },
            [0xF, _, 0x3, 0x3] => Instruction::StoreBcd { x },
            [0xF, _, 0x5, 0x5] => Instruction::StoreRegisters { x },
            [0xF, _, 0x6, 0x5] => Instruction::LoadRegisters { x },
            _ => return None,
        };
        Some(instruction)
    }
}
