//! Encodes a voltage write and decodes a loopback of it, with the wire trace
//! printed to the terminal. No hardware required.

use cv_sysex::{Command, CommandMessage, Decode, Encode, Parameter, Reply, MANUFACTURER_ID};

fn main() {
    simplelog::TermLogger::init(
        log::LevelFilter::Trace,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Always,
    )
    .unwrap();

    let message = CommandMessage::with_f32(Command::Set, Parameter::Ch1MaxVoltage, 5.0);
    let payload = message.encode_to_vec();

    // What the device would see once the transport adds the framing.
    let mut framed = vec![0xF0];
    framed.extend_from_slice(&MANUFACTURER_ID);
    framed.extend_from_slice(&payload);
    framed.push(0xF7);

    let reply = Reply::decode(&mut framed.as_slice()).unwrap();
    println!(
        "loopback: {} {} = {} V",
        reply.command(),
        reply.parameter(),
        reply.as_f32()
    );
}
