//! Function framing
//!
//! A unit whose root carries a name is emitted as a global function with a
//! frame-pointer prologue and the mirroring epilogue.

use crate::options::GeneratorOptions;
use stackcg_codegen::{AsmInst, Reg};

/// Text section header and symbol directives, then the function label
pub(super) fn function_header(name: &str, options: &GeneratorOptions) -> Vec<AsmInst> {
    vec![
        AsmInst::Section(".text".to_string()),
        AsmInst::Align(options.text_align),
        AsmInst::Globl(name.to_string()),
        AsmInst::TypeFunction(name.to_string()),
        AsmInst::Label(name.to_string()),
    ]
}

/// Save the caller's frame pointer and establish a new frame
pub(super) fn prologue() -> Vec<AsmInst> {
    vec![
        AsmInst::Pushq(Reg::Rbp),
        AsmInst::Movq(Reg::Rsp.into(), Reg::Rbp.into()),
    ]
}

/// Drop everything pushed in the frame and restore the caller's frame pointer
pub(super) fn frame_teardown() -> Vec<AsmInst> {
    vec![
        AsmInst::Movq(Reg::Rbp.into(), Reg::Rsp.into()),
        AsmInst::Popq(Reg::Rbp),
    ]
}

pub(super) fn epilogue() -> Vec<AsmInst> {
    let mut insts = frame_teardown();
    insts.push(AsmInst::Ret);
    insts
}
