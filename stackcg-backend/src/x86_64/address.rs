//! Addressing descriptor conversion

use crate::error::CodegenError;
use stackcg_codegen::MemOperand;
use stackcg_ir::{Addr, OpType};

/// Convert a caller descriptor into an AT&T memory operand
///
/// `op` names the node the descriptor belongs to, for error reporting.
pub(super) fn to_mem_operand(addr: &Addr, op: OpType) -> Result<MemOperand, CodegenError> {
    if addr.is_empty() {
        return Err(CodegenError::EmptyAddress { op });
    }
    if addr.index.is_some() && !addr.has_valid_scale() {
        return Err(CodegenError::InvalidScale { op, scale: addr.scale });
    }

    Ok(MemOperand {
        symbol: None,
        offset: addr.offset,
        base: addr.base.clone(),
        index: addr.index.clone(),
        scale: addr.scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(addr: Addr) -> String {
        to_mem_operand(&addr, OpType::Lea).unwrap().to_string()
    }

    #[test]
    fn test_rendering() {
        assert_eq!(render(Addr::reg("%rbp")), "(%rbp)");
        assert_eq!(render(Addr::reg("%rbp").off(-8)), "-8(%rbp)");
        assert_eq!(render(Addr::reg("%rax").idx("%rcx", 8)), "(%rax,%rcx,8)");
        assert_eq!(render(Addr::reg("%rax").idx("%rcx", 4).off(16)), "16(%rax,%rcx,4)");
        assert_eq!(render(Addr::new().idx("%rbx", 2).off(32)), "32(,%rbx,2)");
        assert_eq!(render(Addr::absolute(1000)), "1000");
    }

    #[test]
    fn test_index_defaults_to_unit_scale() {
        let mut addr = Addr::reg("%rsi");
        addr.index = Some("%rdi".to_string());
        assert_eq!(render(addr), "(%rsi,%rdi,1)");
    }

    #[test]
    fn test_empty_descriptor_is_rejected() {
        assert_eq!(
            to_mem_operand(&Addr::new(), OpType::Lea),
            Err(CodegenError::EmptyAddress { op: OpType::Lea })
        );
    }

    #[test]
    fn test_bad_scale_is_rejected() {
        let addr = Addr::reg("%rax").idx("%rcx", 3);
        assert_eq!(
            to_mem_operand(&addr, OpType::Mov),
            Err(CodegenError::InvalidScale { op: OpType::Mov, scale: 3 })
        );
    }
}
