//! x86-64 Assembly Instruction Definitions
//!
//! This module defines the registers, operands, instructions and assembler
//! directives the backend emits. Everything renders in AT&T syntax
//! (source operand first, `%` register prefix, `$` immediates) as accepted
//! by the GNU assembler.

use stackcg_common::STACK_SLOT_BYTES;
use std::fmt;

/// x86-64 registers used by the stack-machine lowering
///
/// - RAX: primary operand, return value
/// - RCX: secondary operand (CL holds shift counts)
/// - RDX: high half of the dividend, remainder
/// - RBP, RSP: frame and stack pointers
/// - RIP: instruction pointer, for position-independent literal addresses
/// - XMM0, XMM1: double-precision operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Rax, Rcx, Rdx,
    Rbp, Rsp,
    Rip,

    // Sub-registers
    Ax,   // Low 16 bits of RAX (x87 status word target)
    Cl,   // Low 8 bits of RCX (shift count)

    // SSE
    Xmm0, Xmm1,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg::Rax => "%rax",
            Reg::Rcx => "%rcx",
            Reg::Rdx => "%rdx",
            Reg::Rbp => "%rbp",
            Reg::Rsp => "%rsp",
            Reg::Rip => "%rip",
            Reg::Ax => "%ax",
            Reg::Cl => "%cl",
            Reg::Xmm0 => "%xmm0",
            Reg::Xmm1 => "%xmm1",
        };
        write!(f, "{name}")
    }
}

/// Memory operand: `disp(base,index,scale)`
///
/// Register names are kept as text so caller-supplied descriptors can name
/// any register the assembler accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemOperand {
    pub symbol: Option<String>,
    pub offset: i64,
    pub base: Option<String>,
    pub index: Option<String>,
    pub scale: u8,
}

impl MemOperand {
    /// `(reg)`
    pub fn at(base: Reg) -> Self {
        Self::at_offset(base, 0)
    }

    /// `offset(reg)`
    pub fn at_offset(base: Reg, offset: i64) -> Self {
        Self {
            offset,
            base: Some(base.to_string()),
            scale: 1,
            ..Self::default()
        }
    }

    /// The `slot`-th evaluation stack slot below the top: `slot*8(%rsp)`
    pub fn stack_slot(slot: i64) -> Self {
        Self::at_offset(Reg::Rsp, slot * STACK_SLOT_BYTES)
    }

    /// `symbol(reg)`, e.g. a RIP-relative literal address
    pub fn symbol_rel(symbol: impl Into<String>, base: Reg) -> Self {
        Self {
            symbol: Some(symbol.into()),
            base: Some(base.to_string()),
            scale: 1,
            ..Self::default()
        }
    }
}

impl fmt::Display for MemOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.symbol, self.offset) {
            (Some(sym), 0) => write!(f, "{sym}")?,
            (Some(sym), off) => write!(f, "{sym}{off:+}")?,
            (None, 0) => {}
            (None, off) => write!(f, "{off}")?,
        }

        if self.base.is_none() && self.index.is_none() {
            return Ok(());
        }

        write!(f, "(")?;
        if let Some(base) = &self.base {
            write!(f, "{base}")?;
        }
        if let Some(index) = &self.index {
            let scale = if self.scale == 0 { 1 } else { self.scale };
            write!(f, ",{index},{scale}")?;
        }
        write!(f, ")")
    }
}

/// Instruction operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(i64),
    Mem(MemOperand),
}

impl From<Reg> for Operand {
    fn from(reg: Reg) -> Self {
        Operand::Reg(reg)
    }
}

impl From<MemOperand> for Operand {
    fn from(mem: MemOperand) -> Self {
        Operand::Mem(mem)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{reg}"),
            Operand::Imm(imm) => write!(f, "${imm}"),
            Operand::Mem(mem) => write!(f, "{mem}"),
        }
    }
}

/// Condition codes for conditional jumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    E, Ne,
    L, Le, G, Ge,   // Signed
    A, Ae, B, Be,   // Unsigned / unordered float
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self {
            Cond::E => "e",
            Cond::Ne => "ne",
            Cond::L => "l",
            Cond::Le => "le",
            Cond::G => "g",
            Cond::Ge => "ge",
            Cond::A => "a",
            Cond::Ae => "ae",
            Cond::B => "b",
            Cond::Be => "be",
        };
        write!(f, "{suffix}")
    }
}

/// x86-64 instructions and assembler directives
///
/// Operand order follows AT&T: `Movq(src, dst)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInst {
    // Data movement
    Movq(Operand, Operand),         // dst = src
    Leaq(MemOperand, Reg),          // dst = &mem
    Pushq(Reg),
    Popq(Reg),

    // Integer arithmetic
    Addq(Operand, Reg),             // dst += src
    Subq(Operand, Reg),             // dst -= src
    Imulq(Reg, Reg),                // dst *= src
    Cqto,                           // RDX:RAX = sign-extend RAX
    Idivq(Reg),                     // RAX = RDX:RAX / src, RDX = remainder

    // Bitwise
    Andq(Reg, Reg),
    Orq(Reg, Reg),
    Xorq(Reg, Reg),
    Notq(Reg),
    Shlq(Reg, Reg),                 // dst <<= count (count in CL)
    Shrq(Reg, Reg),                 // dst >>= count (logical)

    // Flags
    Cmpq(Reg, Reg),                 // flags = dst - src
    Testq(Reg, Reg),                // flags = dst & src
    Testw(Operand, Reg),

    // SSE double precision
    Movsd(Operand, Operand),
    Addsd(Reg, Reg),
    Subsd(Reg, Reg),
    Mulsd(Reg, Reg),
    Divsd(Reg, Reg),
    Ucomisd(Reg, Reg),              // unordered compare dst with src

    // x87
    Fldl(MemOperand),               // push double onto the x87 stack
    Fprem,                          // st(0) = partial remainder of st(0) / st(1)
    Fnstsw(Reg),                    // status word -> AX
    FstpSt(u8),                     // st(n) = st(0), pop
    Fstpl(MemOperand),              // store double, pop

    // Control flow
    Call(String),
    Ret,
    Jmp(String),
    Jcc(Cond, String),
    Nop,

    // Assembler directives
    Section(String),
    Align(u32),
    Globl(String),
    TypeFunction(String),
    StringLit(String),

    // Pseudo
    Label(String),
    Comment(String),
}

impl AsmInst {
    /// Labels and directives start in column zero
    pub fn is_unindented(&self) -> bool {
        matches!(
            self,
            AsmInst::Label(_)
                | AsmInst::Section(_)
                | AsmInst::Align(_)
                | AsmInst::Globl(_)
                | AsmInst::TypeFunction(_)
                | AsmInst::StringLit(_)
        )
    }

    /// Bytes this instruction adds to the machine stack (negative when it releases)
    pub fn stack_delta(&self) -> i64 {
        match self {
            AsmInst::Pushq(_) => 8,
            AsmInst::Popq(_) => -8,
            AsmInst::Addq(Operand::Imm(n), Reg::Rsp) => -n,
            AsmInst::Subq(Operand::Imm(n), Reg::Rsp) => *n,
            _ => 0,
        }
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Data movement
            AsmInst::Movq(src, dst) => write!(f, "movq {src}, {dst}"),
            AsmInst::Leaq(mem, dst) => write!(f, "leaq {mem}, {dst}"),
            AsmInst::Pushq(reg) => write!(f, "pushq {reg}"),
            AsmInst::Popq(reg) => write!(f, "popq {reg}"),

            // Integer arithmetic
            AsmInst::Addq(src, dst) => write!(f, "addq {src}, {dst}"),
            AsmInst::Subq(src, dst) => write!(f, "subq {src}, {dst}"),
            AsmInst::Imulq(src, dst) => write!(f, "imulq {src}, {dst}"),
            AsmInst::Cqto => write!(f, "cqto"),
            AsmInst::Idivq(src) => write!(f, "idivq {src}"),

            // Bitwise
            AsmInst::Andq(src, dst) => write!(f, "andq {src}, {dst}"),
            AsmInst::Orq(src, dst) => write!(f, "orq {src}, {dst}"),
            AsmInst::Xorq(src, dst) => write!(f, "xorq {src}, {dst}"),
            AsmInst::Notq(reg) => write!(f, "notq {reg}"),
            AsmInst::Shlq(count, dst) => write!(f, "shlq {count}, {dst}"),
            AsmInst::Shrq(count, dst) => write!(f, "shrq {count}, {dst}"),

            // Flags
            AsmInst::Cmpq(src, dst) => write!(f, "cmpq {src}, {dst}"),
            AsmInst::Testq(src, dst) => write!(f, "testq {src}, {dst}"),
            AsmInst::Testw(src, dst) => match src {
                Operand::Imm(mask) => write!(f, "testw ${mask:#x}, {dst}"),
                other => write!(f, "testw {other}, {dst}"),
            },

            // SSE
            AsmInst::Movsd(src, dst) => write!(f, "movsd {src}, {dst}"),
            AsmInst::Addsd(src, dst) => write!(f, "addsd {src}, {dst}"),
            AsmInst::Subsd(src, dst) => write!(f, "subsd {src}, {dst}"),
            AsmInst::Mulsd(src, dst) => write!(f, "mulsd {src}, {dst}"),
            AsmInst::Divsd(src, dst) => write!(f, "divsd {src}, {dst}"),
            AsmInst::Ucomisd(src, dst) => write!(f, "ucomisd {src}, {dst}"),

            // x87
            AsmInst::Fldl(mem) => write!(f, "fldl {mem}"),
            AsmInst::Fprem => write!(f, "fprem"),
            AsmInst::Fnstsw(reg) => write!(f, "fnstsw {reg}"),
            AsmInst::FstpSt(n) => write!(f, "fstp %st({n})"),
            AsmInst::Fstpl(mem) => write!(f, "fstpl {mem}"),

            // Control flow
            AsmInst::Call(target) => write!(f, "call {target}"),
            AsmInst::Ret => write!(f, "ret"),
            AsmInst::Jmp(target) => write!(f, "jmp {target}"),
            AsmInst::Jcc(cond, target) => write!(f, "j{cond} {target}"),
            AsmInst::Nop => write!(f, "nop"),

            // Directives
            AsmInst::Section(name) => write!(f, ".section {name}"),
            AsmInst::Align(n) => write!(f, ".align {n}"),
            AsmInst::Globl(name) => write!(f, ".globl {name}"),
            AsmInst::TypeFunction(name) => write!(f, ".type {name}, @function"),
            AsmInst::StringLit(text) => write!(f, ".string \"{}\"", escape_string(text)),

            // Pseudo
            AsmInst::Label(label) => write!(f, "{label}:"),
            AsmInst::Comment(text) => write!(f, "# {text}"),
        }
    }
}

/// Escape text for a `.string` directive
///
/// Printable ASCII passes through unchanged; quotes, backslashes and control
/// bytes are escaped the way the GNU assembler reads them back. Non-ASCII
/// text is emitted as its UTF-8 bytes.
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out
}
