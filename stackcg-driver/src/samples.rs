//! Built-in sample trees
//!
//! Each sample pairs an IR tree with text its assembly must contain. The
//! `test` command runs them as a smoke test of the whole pipeline.

use stackcg_ir::{Addr, Node, OpType};

pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Node,
    expected: &'static [&'static str],
}

impl Sample {
    pub fn tree(&self) -> Node {
        (self.build)()
    }

    /// Expected fragments absent from `asm`
    pub fn missing(&self, asm: &str) -> Vec<&'static str> {
        self.expected
            .iter()
            .copied()
            .filter(|fragment| !asm.contains(fragment))
            .collect()
    }
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "arithmetic",
        description: "(42 + 13) - 5",
        build: arithmetic,
        expected: &["movq $42, %rax", "movq $13, %rax", "addq %rcx, %rax", "subq %rcx, %rax"],
    },
    Sample {
        name: "bitwise",
        description: "~((0x5A & 0x3F) << 2)",
        build: bitwise,
        expected: &["movq $90, %rax", "movq $63, %rax", "andq %rcx, %rax", "shlq %cl, %rax", "notq %rax"],
    },
    Sample {
        name: "memory",
        description: "store 42 at address 1000, then load it back",
        build: memory,
        expected: &["movq $1000, %rax", "movq %rcx, (%rax)", "movq (%rax), %rax"],
    },
    Sample {
        name: "strings",
        description: "two string literals",
        build: strings,
        expected: &[
            "leaq .LC0(%rip), %rax",
            "leaq .LC1(%rip), %rax",
            ".section .rodata",
            ".string \"Hello, world!\"",
            ".string \"Test string\"",
        ],
    },
    Sample {
        name: "function",
        description: "add_numbers: two locals summed and returned",
        build: function,
        expected: &[
            ".globl add_numbers",
            "add_numbers:",
            "pushq %rbp",
            "movq %rsp, %rbp",
            "movq %rax, -8(%rbp)",
            "movq %rax, -16(%rbp)",
            "popq %rbp",
            "ret",
        ],
    },
    Sample {
        name: "float",
        description: "(1.5 + 2.5) fmod 3.0",
        build: float,
        expected: &["addsd %xmm1, %xmm0", "fprem", "fstpl (%rsp)"],
    },
    Sample {
        name: "branch",
        description: "compare and branch to one of two labels",
        build: branch,
        expected: &["cmpq %rcx, %rax", "jl .Lless", "jmp .Lend", ".Lless:", ".Lend:"],
    },
];

pub fn find(name: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|sample| sample.name == name)
}

pub fn names() -> Vec<&'static str> {
    SAMPLES.iter().map(|sample| sample.name).collect()
}

fn arithmetic() -> Node {
    Node::root([Node::binary(
        OpType::ISub,
        Node::binary(OpType::IAdd, Node::num(42), Node::num(13)),
        Node::num(5),
    )])
}

fn bitwise() -> Node {
    Node::root([Node::unary(
        OpType::BNot,
        Node::binary(
            OpType::BShl,
            Node::binary(OpType::BAnd, Node::num(0x5A), Node::num(0x3F)),
            Node::num(2),
        ),
    )])
}

fn memory() -> Node {
    Node::root([
        Node::store(Node::num(1000), Node::num(42)),
        Node::load(Node::num(1000)),
    ])
}

fn strings() -> Node {
    Node::root([Node::string("Hello, world!"), Node::string("Test string")])
}

fn function() -> Node {
    let local = |offset| Addr::reg("%rbp").off(offset);
    Node::function(
        "add_numbers",
        [
            Node::mov(local(-8), Node::num(10)),
            Node::mov(local(-16), Node::num(20)),
            Node::ret(Some(Node::binary(
                OpType::IAdd,
                Node::load(Node::lea(local(-8))),
                Node::load(Node::lea(local(-16))),
            ))),
        ],
    )
}

fn float() -> Node {
    let double = |value: f64| Node::num(value.to_bits() as i64);
    Node::root([Node::binary(
        OpType::FMod,
        Node::binary(OpType::FAdd, double(1.5), double(2.5)),
        double(3.0),
    )])
}

fn branch() -> Node {
    Node::root([
        Node::binary(OpType::ICmp, Node::num(1), Node::num(2)),
        Node::jump(OpType::Jl, ".Lless"),
        Node::push(Node::num(0)),
        Node::jump(OpType::Jmp, ".Lend"),
        Node::label(".Lless"),
        Node::push(Node::num(1)),
        Node::label(".Lend"),
    ])
}
