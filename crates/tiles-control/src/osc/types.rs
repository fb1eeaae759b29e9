//! OSC type conversion and wire encoding helpers

use rosc::{OscMessage, OscPacket, OscType};

use super::command::{Command, TypedArgument};
use crate::{error::TilesError, Result};

/// Convert a typed argument to its OSC representation
pub fn typed_argument_to_osc(arg: &TypedArgument) -> OscType {
    match arg {
        TypedArgument::String(s) => OscType::String(s.clone()),
        TypedArgument::Int(i) => OscType::Int(*i),
    }
}

/// Convert an OSC argument to a typed argument.
///
/// Only `s` and `i` are part of the tiles protocol; anything else is rejected
/// rather than coerced.
pub fn osc_to_typed_argument(arg: &OscType) -> Result<TypedArgument> {
    match arg {
        OscType::String(s) => Ok(TypedArgument::String(s.clone())),
        OscType::Int(i) => Ok(TypedArgument::Int(*i)),
        other => Err(TilesError::InvalidArgument(format!(
            "Unsupported OSC type: {:?}",
            other
        ))),
    }
}

/// Build the `rosc` message for a command
pub fn command_to_message(command: &Command) -> OscMessage {
    OscMessage {
        addr: command.address().to_string(),
        args: command.args().iter().map(typed_argument_to_osc).collect(),
    }
}

/// Encode a command as a single OSC datagram payload
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let packet = OscPacket::Message(command_to_message(command));
    rosc::encoder::encode(&packet).map_err(|e| {
        TilesError::OscError(format!(
            "failed to encode {}: {:?}",
            command.address(),
            e
        ))
    })
}

/// Decode a datagram into its messages, flattening bundles in order
pub fn decode_datagram(bytes: &[u8]) -> Result<Vec<OscMessage>> {
    let (_, packet) = rosc::decoder::decode_udp(bytes)
        .map_err(|e| TilesError::OscError(format!("failed to decode datagram: {:?}", e)))?;

    let mut messages = Vec::new();
    flatten_packet(packet, &mut messages);
    Ok(messages)
}

fn flatten_packet(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(message) => out.push(message),
        OscPacket::Bundle(bundle) => {
            for inner in bundle.content {
                flatten_packet(inner, out);
            }
        }
    }
}

/// View an inbound message as a command when it only carries `s`/`i` arguments
pub fn message_to_command(message: &OscMessage) -> Result<Command> {
    let args = message
        .args
        .iter()
        .map(osc_to_typed_argument)
        .collect::<Result<Vec<_>>>()?;
    Ok(Command::from_parts(message.addr.clone(), args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc_to_typed_argument() {
        assert_eq!(
            osc_to_typed_argument(&OscType::Int(42)).unwrap(),
            TypedArgument::Int(42)
        );
        assert_eq!(
            osc_to_typed_argument(&OscType::String("Dana".into())).unwrap(),
            TypedArgument::String("Dana".into())
        );
        assert!(osc_to_typed_argument(&OscType::Float(0.5)).is_err());
        assert!(osc_to_typed_argument(&OscType::Bool(true)).is_err());
    }

    #[test]
    fn test_command_to_message() {
        let command = Command::build("/tileIndex/replaceByName")
            .with_int(1)
            .with_int(3)
            .with_string("Erin");
        let message = command_to_message(&command);
        assert_eq!(message.addr, "/tiles/tileIndex/replaceByName");
        assert_eq!(
            message.args,
            vec![
                OscType::Int(1),
                OscType::Int(3),
                OscType::String("Erin".into())
            ]
        );
    }

    #[test]
    fn test_encoded_datagram_layout() {
        let command = Command::build("/enableGallery").with_int(2);
        let bytes = encode_command(&command).unwrap();

        // "/tiles/enableGallery" is 20 bytes, padded to 24 with NULs
        assert_eq!(&bytes[..20], b"/tiles/enableGallery");
        assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
        // Type tag string ",i" padded to 4 bytes
        assert_eq!(&bytes[24..28], b",i\0\0");
        // Big-endian int32
        assert_eq!(&bytes[28..32], &2i32.to_be_bytes());
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_decode_flattens_bundles() {
        let first = command_to_message(&Command::build("/startPMI"));
        let second = command_to_message(&Command::build("/userName/block").with_string("Fay"));
        let bundle = OscPacket::Bundle(rosc::OscBundle {
            timetag: rosc::OscTime {
                seconds: 0,
                fractional: 1,
            },
            content: vec![OscPacket::Message(first), OscPacket::Message(second)],
        });
        let bytes = rosc::encoder::encode(&bundle).unwrap();

        let messages = decode_datagram(&bytes).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].addr, "/tiles/startPMI");
        assert_eq!(messages[1].addr, "/tiles/userName/block");
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_datagram(b"not osc").is_err());
    }

    #[test]
    fn test_message_to_command_rejects_floats() {
        let message = OscMessage {
            addr: "/tiles/status".into(),
            args: vec![OscType::Float(1.0)],
        };
        assert!(message_to_command(&message).is_err());
    }
}
