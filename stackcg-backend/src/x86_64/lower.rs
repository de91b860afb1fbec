//! Node lowering for the x86-64 generator
//!
//! Trees are walked in post-order with an explicit work stack, so nesting
//! depth is limited by the heap rather than the host call stack. Each node
//! leaves its value on the machine stack: operands are popped right first
//! (into RCX) and left second (into RAX), the result is computed in RAX and
//! pushed back. Floating operations work on the two top stack slots in place.

use crate::error::CodegenError;
use crate::literals::StringPool;
use crate::naming::{literal_label, LabelGenerator};
use crate::options::GeneratorOptions;
use super::{address, frame};
use log::{trace, warn};
use stackcg_codegen::{AsmInst, Cond, MemOperand, Operand, Reg};
use stackcg_common::STACK_SLOT_BYTES;
use stackcg_ir::{Node, OpType};

/// Status word bit C2: set while FPREM has not finished reducing
const FPU_C2_MASK: i64 = 0x400;

enum Step<'n> {
    Enter(&'n Node),
    Exit(&'n Node),
}

/// Lowers one tree into a fresh instruction sequence
///
/// String literals go straight into the unit's pool; on failure the pool is
/// rolled back so a failed call leaves no trace.
pub(super) struct Lowerer<'g> {
    out: Vec<AsmInst>,
    pool: &'g mut StringPool,
    labels: &'g mut LabelGenerator,
    options: &'g GeneratorOptions,
    framed: bool,
}

impl<'g> Lowerer<'g> {
    pub(super) fn new(
        pool: &'g mut StringPool,
        labels: &'g mut LabelGenerator,
        options: &'g GeneratorOptions,
        framed: bool,
    ) -> Self {
        Self {
            out: Vec::new(),
            pool,
            labels,
            options,
            framed,
        }
    }

    pub(super) fn lower_tree(mut self, root: &Node) -> Result<Vec<AsmInst>, CodegenError> {
        let pool_mark = self.pool.len();
        match self.walk(root) {
            Ok(()) => Ok(self.out),
            Err(err) => {
                self.pool.truncate(pool_mark);
                Err(err)
            }
        }
    }

    fn walk(&mut self, root: &Node) -> Result<(), CodegenError> {
        let mut work = vec![Step::Enter(root)];
        while let Some(step) = work.pop() {
            match step {
                Step::Enter(node) => {
                    check_shape(node)?;
                    work.push(Step::Exit(node));
                    // First operand to evaluate ends up on top
                    for kid in evaluation_order(node).into_iter().rev() {
                        work.push(Step::Enter(kid));
                    }
                }
                Step::Exit(node) => self.lower_node(node)?,
            }
        }
        Ok(())
    }

    /// Emit the node's own instructions; its children are already lowered
    fn lower_node(&mut self, node: &Node) -> Result<(), CodegenError> {
        let op = node.op();
        trace!("x86_64: lowering {} ({} kids)", op, node.kids().len());

        if self.options.annotate && !matches!(op, OpType::Root | OpType::Push) {
            self.emit(AsmInst::Comment(op.name().to_string()));
        }

        match op {
            // The children did all the work
            OpType::Root | OpType::Push => {}

            OpType::Label => self.emit(AsmInst::Label(node.symbol().to_string())),

            OpType::Num => {
                self.emit(AsmInst::Movq(Operand::Imm(node.value), Reg::Rax.into()));
                self.push(Reg::Rax);
            }
            OpType::Str => {
                let id = self.pool.add(&node.strval);
                self.emit(AsmInst::Leaq(MemOperand::symbol_rel(literal_label(id), Reg::Rip), Reg::Rax));
                self.push(Reg::Rax);
            }

            OpType::IAdd => self.int_binary(AsmInst::Addq(Reg::Rcx.into(), Reg::Rax)),
            OpType::ISub => self.int_binary(AsmInst::Subq(Reg::Rcx.into(), Reg::Rax)),
            OpType::IMul => self.int_binary(AsmInst::Imulq(Reg::Rcx, Reg::Rax)),
            OpType::IDiv => self.int_divide(Reg::Rax),
            OpType::IMod => self.int_divide(Reg::Rdx),

            OpType::FAdd => self.float_binary(AsmInst::Addsd(Reg::Xmm1, Reg::Xmm0)),
            OpType::FSub => self.float_binary(AsmInst::Subsd(Reg::Xmm1, Reg::Xmm0)),
            OpType::FMul => self.float_binary(AsmInst::Mulsd(Reg::Xmm1, Reg::Xmm0)),
            OpType::FDiv => self.float_binary(AsmInst::Divsd(Reg::Xmm1, Reg::Xmm0)),
            OpType::FMod => self.float_remainder(),

            OpType::BAnd => self.int_binary(AsmInst::Andq(Reg::Rcx, Reg::Rax)),
            OpType::BOr => self.int_binary(AsmInst::Orq(Reg::Rcx, Reg::Rax)),
            OpType::BXor => self.int_binary(AsmInst::Xorq(Reg::Rcx, Reg::Rax)),
            OpType::BShl => self.int_binary(AsmInst::Shlq(Reg::Cl, Reg::Rax)),
            OpType::BShr => self.int_binary(AsmInst::Shrq(Reg::Cl, Reg::Rax)),
            OpType::BNot => {
                self.pop(Reg::Rax);
                self.emit(AsmInst::Notq(Reg::Rax));
                self.push(Reg::Rax);
            }

            OpType::ICmp => self.int_compare(AsmInst::Cmpq(Reg::Rcx, Reg::Rax)),
            OpType::Test => self.int_compare(AsmInst::Testq(Reg::Rcx, Reg::Rax)),
            OpType::FCmp => {
                self.load_float_operands();
                self.emit(AsmInst::Ucomisd(Reg::Xmm1, Reg::Xmm0));
                self.release_slots(2);
            }

            OpType::Lea => {
                let mem = address::to_mem_operand(&node.addr, op)?;
                self.emit(AsmInst::Leaq(mem, Reg::Rax));
                self.push(Reg::Rax);
            }
            OpType::Load => {
                self.pop(Reg::Rax);
                self.emit(AsmInst::Movq(MemOperand::at(Reg::Rax).into(), Reg::Rax.into()));
                self.push(Reg::Rax);
            }
            OpType::Store => {
                self.pop(Reg::Rcx); // value
                self.pop(Reg::Rax); // address
                self.emit(AsmInst::Movq(Reg::Rcx.into(), MemOperand::at(Reg::Rax).into()));
            }
            OpType::Mov => {
                // Only the destination's descriptor is read; the node itself is never lowered
                let dest = address::to_mem_operand(&node.kids()[0].addr, op)?;
                self.pop(Reg::Rax);
                self.emit(AsmInst::Movq(Reg::Rax.into(), dest.into()));
            }

            OpType::Call => {
                let argc = node.kids().len() as i64;
                self.emit(AsmInst::Call(node.symbol().to_string()));
                if argc > 0 {
                    self.release_slots(argc);
                }
                self.push(Reg::Rax);
            }
            OpType::Ret => {
                if !node.kids().is_empty() {
                    self.pop(Reg::Rax);
                }
                if self.framed {
                    self.out.extend(frame::frame_teardown());
                }
                self.emit(AsmInst::Ret);
            }
            OpType::Jmp
            | OpType::Je | OpType::Jne
            | OpType::Jl | OpType::Jle | OpType::Jg | OpType::Jge
            | OpType::Ja | OpType::Jae | OpType::Jb | OpType::Jbe => {
                let target = node.symbol().to_string();
                match jump_cond(op) {
                    Some(cond) => self.emit(AsmInst::Jcc(cond, target)),
                    None => self.emit(AsmInst::Jmp(target)),
                }
            }

            OpType::Pop => self.pop(Reg::Rax),

            OpType::Unknown => {
                warn!("x86_64: unrecognized node kind, emitting nop");
                self.emit(AsmInst::Nop);
            }
        }

        Ok(())
    }

    fn emit(&mut self, inst: AsmInst) {
        self.out.push(inst);
    }

    fn push(&mut self, reg: Reg) {
        self.emit(AsmInst::Pushq(reg));
    }

    fn pop(&mut self, reg: Reg) {
        self.emit(AsmInst::Popq(reg));
    }

    /// Right operand into RCX, left operand into RAX
    fn pop_operands(&mut self) {
        self.pop(Reg::Rcx);
        self.pop(Reg::Rax);
    }

    fn release_slots(&mut self, slots: i64) {
        self.emit(AsmInst::Addq(Operand::Imm(slots * STACK_SLOT_BYTES), Reg::Rsp));
    }

    fn int_binary(&mut self, inst: AsmInst) {
        self.pop_operands();
        self.emit(inst);
        self.push(Reg::Rax);
    }

    /// Signed division; `result` is RAX for the quotient, RDX for the remainder
    fn int_divide(&mut self, result: Reg) {
        self.pop_operands();
        self.emit(AsmInst::Cqto);
        self.emit(AsmInst::Idivq(Reg::Rcx));
        self.push(result);
    }

    fn int_compare(&mut self, inst: AsmInst) {
        self.pop_operands();
        self.emit(inst);
    }

    /// Right operand (top slot) into XMM1, left operand into XMM0
    fn load_float_operands(&mut self) {
        self.emit(AsmInst::Movsd(MemOperand::stack_slot(0).into(), Reg::Xmm1.into()));
        self.emit(AsmInst::Movsd(MemOperand::stack_slot(1).into(), Reg::Xmm0.into()));
    }

    fn float_binary(&mut self, inst: AsmInst) {
        self.load_float_operands();
        self.emit(inst);
        self.release_slots(1);
        self.emit(AsmInst::Movsd(Reg::Xmm0.into(), MemOperand::stack_slot(0).into()));
    }

    /// SSE has no remainder, so use the x87 unit and repeat FPREM until
    /// the reduction is complete
    fn float_remainder(&mut self) {
        let retry = self.labels.next_label();
        self.emit(AsmInst::Fldl(MemOperand::stack_slot(0))); // divisor
        self.emit(AsmInst::Fldl(MemOperand::stack_slot(1))); // dividend
        self.emit(AsmInst::Label(retry.clone()));
        self.emit(AsmInst::Fprem);
        self.emit(AsmInst::Fnstsw(Reg::Ax));
        self.emit(AsmInst::Testw(Operand::Imm(FPU_C2_MASK), Reg::Ax));
        self.emit(AsmInst::Jcc(Cond::Ne, retry));
        self.emit(AsmInst::FstpSt(1));
        self.release_slots(1);
        self.emit(AsmInst::Fstpl(MemOperand::stack_slot(0)));
    }
}

/// Children in the order their values must be pushed
fn evaluation_order(node: &Node) -> Vec<&Node> {
    let kids = node.kids();
    match node.op() {
        OpType::Mov => kids.get(1).into_iter().collect(),
        // Last argument first, so arguments sit on the stack in declared order
        OpType::Call => kids.iter().rev().collect(),
        OpType::Unknown => Vec::new(),
        _ => kids.iter().collect(),
    }
}

fn check_shape(node: &Node) -> Result<(), CodegenError> {
    let op = node.op();
    let arity = op.arity();
    if !arity.admits(node.kids().len()) {
        return Err(CodegenError::ArityMismatch {
            op,
            expected: arity,
            found: node.kids().len(),
        });
    }

    let needs_symbol = matches!(op, OpType::Label | OpType::Call) || op.is_jump();
    if needs_symbol && node.symbol().is_empty() {
        return Err(CodegenError::MissingSymbol { op });
    }

    // A root's statements may leave nothing; every other operand is popped
    if op != OpType::Root {
        if let Some(kid) = evaluation_order(node).into_iter().find(|kid| !kid.op().produces_value()) {
            return Err(CodegenError::MissingValue { op, operand: kid.op() });
        }
    }
    Ok(())
}

fn jump_cond(op: OpType) -> Option<Cond> {
    match op {
        OpType::Je => Some(Cond::E),
        OpType::Jne => Some(Cond::Ne),
        OpType::Jl => Some(Cond::L),
        OpType::Jle => Some(Cond::Le),
        OpType::Jg => Some(Cond::G),
        OpType::Jge => Some(Cond::Ge),
        OpType::Ja => Some(Cond::A),
        OpType::Jae => Some(Cond::Ae),
        OpType::Jb => Some(Cond::B),
        OpType::Jbe => Some(Cond::Be),
        _ => None,
    }
}
