use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};

pub const ICMP_ECHO_REQUEST: u8 = 8;
pub const ICMP_ECHO_REPLY: u8 = 0;

/// Payload carried in every echo request we send.
pub const ECHO_PAYLOAD: &[u8] = b"rprobe";

/// One's-complement Internet checksum over `data`, as used by IP and ICMP
/// headers. An odd-length buffer is summed as if padded with one trailing
/// zero byte.
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut i = 0;

    // Sum big-endian 16-bit words
    while i + 1 < data.len() {
        let word = ((data[i] as u16) << 8) | (data[i + 1] as u16);
        sum += word as u32;
        i += 2;
    }

    // Odd length: the last byte forms a word with an implicit zero
    if i < data.len() {
        sum += (data[i] as u32) << 8;
    }

    // Fold carries back into the low 16 bits
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !sum as u16
}

#[derive(Debug, Clone)]
pub struct IcmpPacket {
    pub icmp_type: u8,
    pub code: u8,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence: u16,
    pub payload: Vec<u8>,
}

impl IcmpPacket {
    /// Build an echo request with a valid checksum. The packet is first
    /// serialized with a zeroed checksum field, the checksum is computed
    /// over that buffer, and the final packet is rebuilt with the result
    /// at offset 2 rather than patched in place.
    pub fn new_echo_request(identifier: u16, sequence: u16) -> Self {
        let mut packet = Self {
            icmp_type: ICMP_ECHO_REQUEST,
            code: 0,
            checksum: 0,
            identifier,
            sequence,
            payload: ECHO_PAYLOAD.to_vec(),
        };

        packet.checksum = checksum(&packet.to_bytes());
        packet
    }

    pub fn from_bytes(data: &[u8]) -> anyhow::Result<Self> {
        if data.len() < 8 {
            return Err(anyhow::anyhow!("ICMP packet too short: {} bytes", data.len()));
        }

        let mut cursor = Cursor::new(data);
        let icmp_type = cursor.read_u8()?;
        let code = cursor.read_u8()?;
        let checksum = cursor.read_u16::<BigEndian>()?;
        let identifier = cursor.read_u16::<BigEndian>()?;
        let sequence = cursor.read_u16::<BigEndian>()?;

        let mut payload = Vec::new();
        cursor.read_to_end(&mut payload)?;

        Ok(Self {
            icmp_type,
            code,
            checksum,
            identifier,
            sequence,
            payload,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.payload.len());
        bytes.write_u8(self.icmp_type).unwrap();
        bytes.write_u8(self.code).unwrap();
        bytes.write_u16::<BigEndian>(self.checksum).unwrap();
        bytes.write_u16::<BigEndian>(self.identifier).unwrap();
        bytes.write_u16::<BigEndian>(self.sequence).unwrap();
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn is_echo_reply(&self) -> bool {
        self.icmp_type == ICMP_ECHO_REPLY
    }

    /// Matches a received datagram against the request we sent.
    pub fn matches(&self, identifier: u16, sequence: u16) -> bool {
        self.is_echo_reply() && self.identifier == identifier && self.sequence == sequence
    }

    /// A packet carrying its correct checksum sums to zero.
    pub fn verify_checksum(&self) -> bool {
        checksum(&self.to_bytes()) == 0
    }
}
