use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use minievm::{disasm, Halt, InstructionSet, Machine, PersistentStorage, VmConfig, Word};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "evm", about = "Minimal EVM-subset interpreter")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Run bytecode to completion
    Run {
        /// Hex bytecode (e.g., 0x6001600101) or @file with raw bytes
        code: String,
        /// Gas budget
        #[arg(long, default_value_t = 10_000_000)]
        gas: u64,
        /// Calldata as hex
        #[arg(long, default_value = "0x")]
        calldata: String,
        /// Print the full final stack
        #[arg(long)]
        dump_stack: bool,
        /// JSON file with pre-existing storage (slot -> value hex map)
        #[arg(long)]
        storage: Option<String>,
        /// Dump final storage JSON to stdout, or to @file
        #[arg(long)]
        dump_storage: Option<Option<String>>,
        /// Emit the whole run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Disassemble bytecode
    Disasm {
        /// Hex bytecode or @file
        code: String,
    },
    /// Step-through trace
    Trace {
        /// Hex bytecode or @file
        code: String,
        /// Calldata as hex
        #[arg(long, default_value = "0x")]
        calldata: String,
        /// Gas budget
        #[arg(long, default_value_t = 10_000_000)]
        gas: u64,
        /// Max steps
        #[arg(long, default_value_t = 10_000)]
        max_steps: usize,
    },
}

#[derive(Debug, Serialize)]
struct RunSummary {
    status: String,
    return_data: String,
    gas_left: u64,
    pc: usize,
    stack: Vec<String>,
    storage: BTreeMap<String, String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Run { code, gas, calldata, dump_stack, storage, dump_storage, json } => {
            run_cmd(&code, gas, &calldata, dump_stack, storage.as_deref(), dump_storage, json)
        }
        Cmd::Disasm { code } => disasm_cmd(&code),
        Cmd::Trace { code, calldata, gas, max_steps } => {
            trace_cmd(&code, &calldata, gas, max_steps)
        }
    }
}

fn run_cmd(
    code_arg: &str,
    gas: u64,
    calldata_hex: &str,
    dump_stack: bool,
    storage_path: Option<&str>,
    dump_storage: Option<Option<String>>,
    json: bool,
) {
    let code = read_code_arg(code_arg);
    let calldata = parse_hex(calldata_hex).unwrap_or_else(|| die("Invalid calldata hex"));
    let mut cfg = VmConfig { gas_limit: gas, calldata, ..VmConfig::default() };
    if let Some(path) = storage_path {
        cfg.storage = Some(load_storage(path));
    }
    let mut machine = Machine::new(code, cfg);
    if let Err(e) = machine.run() {
        die(&format!("Execution error: {e}"));
    }
    if json {
        let summary = RunSummary {
            status: halt_status(&machine).to_string(),
            return_data: format!("0x{}", hex::encode(&machine.return_data)),
            gas_left: machine.gas,
            pc: machine.pc,
            stack: machine.stack.as_slice().iter().rev().map(|v| format!("0x{:x}", v)).collect(),
            storage: storage_map(&machine.storage),
        };
        println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_else(|e| die(&format!("encode summary: {e}"))));
        return;
    }
    println!("halted: {}", halt_status(&machine));
    if !machine.return_data.is_empty() {
        println!("return: 0x{}", hex::encode(&machine.return_data));
    }
    println!("pc: {}", machine.pc);
    println!("gas left: {}", machine.gas);
    println!("stack size: {}", machine.stack.depth());
    if let Some(top) = machine.stack.as_slice().last() {
        println!("top: 0x{:x}", top);
    }
    if dump_stack {
        for (i, v) in machine.stack.as_slice().iter().rev().enumerate() {
            println!("[{}] 0x{:x}", i, v);
        }
    }
    if let Some(ds) = dump_storage {
        let text = serde_json::to_string_pretty(&storage_map(&machine.storage))
            .unwrap_or_else(|e| die(&format!("encode storage: {e}")));
        match ds.as_deref().and_then(|s| s.strip_prefix('@')) {
            Some(path) => std::fs::write(path, text)
                .unwrap_or_else(|e| die(&format!("write storage: {e}"))),
            None => println!("{}", text),
        }
    }
}

fn disasm_cmd(code_arg: &str) {
    let code = read_code_arg(code_arg);
    for line in disasm::disassemble(&code) {
        println!("{}", line);
    }
}

fn trace_cmd(code_arg: &str, calldata_hex: &str, gas: u64, max_steps: usize) {
    let code = read_code_arg(code_arg);
    let calldata = parse_hex(calldata_hex).unwrap_or_else(|| die("Invalid calldata hex"));
    let cfg = VmConfig { gas_limit: gas, calldata, ..VmConfig::default() };
    let mut machine = Machine::new(code, cfg);
    let names = InstructionSet::new();

    let mut steps = 0usize;
    while machine.halted.is_none() && steps < max_steps {
        let op = if machine.pc < machine.code.len() { machine.code[machine.pc] } else { 0x00 };
        println!(
            "pc={:04x} op=0x{:02x} {:12} stack={:2} top={} gas={}",
            machine.pc,
            op,
            names.name_of(op),
            machine.stack.depth(),
            machine
                .stack
                .as_slice()
                .last()
                .map(|v| format!("0x{:x}", v))
                .unwrap_or_else(|| "-".to_string()),
            machine.gas,
        );
        if let Err(e) = machine.step() {
            die(&format!("step error: {e}"));
        }
        steps += 1;
    }
    println!("-- halt: {} --", halt_status(&machine));
    if !machine.return_data.is_empty() {
        println!("return: 0x{}", hex::encode(&machine.return_data));
    }
    println!("gas left: {}", machine.gas);
}

fn read_code_arg(arg: &str) -> Vec<u8> {
    if let Some(rest) = arg.strip_prefix('@') {
        std::fs::read(rest).unwrap_or_else(|e| die(&format!("Failed to read file: {e}")))
    } else {
        parse_hex(arg).unwrap_or_else(|| die("Invalid code hex"))
    }
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let s = s.trim();
    let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if s.is_empty() {
        return Some(Vec::new());
    }
    hex::decode(s).ok()
}

fn parse_word(s: &str) -> Option<Word> {
    let s = s.trim();
    if let Some(h) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        let padded = if h.len() % 2 == 1 { format!("0{h}") } else { h.to_string() };
        let bytes = hex::decode(padded).ok()?;
        if bytes.len() > 32 {
            return None;
        }
        Some(Word::from_big_endian(&bytes))
    } else {
        Word::from_dec_str(s).ok()
    }
}

fn halt_status(machine: &Machine) -> &'static str {
    match machine.halted {
        Some(Halt::Stop) => "STOP",
        Some(Halt::Return) => "RETURN",
        None => "NONE",
    }
}

fn storage_map(storage: &PersistentStorage) -> BTreeMap<String, String> {
    storage
        .iter()
        .map(|(k, v)| (format!("0x{:x}", k), format!("0x{:x}", v)))
        .collect()
}

fn load_storage(path: &str) -> PersistentStorage {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| die(&format!("read storage: {e}")));
    let map: BTreeMap<String, String> = serde_json::from_str(&text)
        .unwrap_or_else(|e| die(&format!("parse storage json: {e}")));
    let mut storage = PersistentStorage::new();
    for (k, v) in map {
        let slot = parse_word(&k).unwrap_or_else(|| die("invalid storage slot"));
        let value = parse_word(&v).unwrap_or_else(|| die("invalid storage value"));
        storage.put(slot, value);
    }
    storage
}

fn die(msg: &str) -> ! {
    eprintln!("{}", msg);
    std::process::exit(1);
}
