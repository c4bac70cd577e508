use std::net::Ipv4Addr;

use dns_parser::{Packet, RData};
use pnet::packet::dns::{DnsClass, DnsTypes, MutableDnsPacket, Opcode, Retcode};
use snapr_common::error::DnsError;

pub const DNS_HDR_LEN: usize = 12;

const QUESTION_FIXED_LEN: usize = 4;
const ANSWER_FIXED_LEN: usize = 16;
const MAX_LABEL_LEN: usize = 63;
const CLASS_IN: DnsClass = DnsClass(1);
const ANSWER_TTL: u32 = 60;

/// A decoded DNS response.
///
/// The packet is decoded once, on construction. [`DnsMessage::a_records`]
/// walks the stored answers and can be called any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    id: u16,
    a_records: Vec<Ipv4Addr>,
}

impl DnsMessage {
    pub fn parse(bytes: &[u8]) -> Result<Self, DnsError> {
        let packet = Packet::parse(bytes).map_err(|e| DnsError::Decode(e.to_string()))?;
        if packet.header.query {
            return Err(DnsError::NotAResponse);
        }

        let a_records: Vec<Ipv4Addr> = packet
            .answers
            .iter()
            .filter_map(|record| match &record.data {
                RData::A(a) => Some(a.0),
                _ => None,
            })
            .collect();

        Ok(Self {
            id: packet.header.id,
            a_records,
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    /// Addresses carried by the A records of the answer section, in wire order.
    pub fn a_records(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.a_records.iter().copied()
    }
}

/// The transaction id and name asked by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub id: u16,
    pub name: String,
}

/// Builds a recursive A/IN question for `domain`.
pub fn create_a_packet(domain: &str, id: u16) -> Result<Vec<u8>, DnsError> {
    let qname: Vec<u8> = encode_dns_name(domain)?;
    let total: usize = DNS_HDR_LEN + qname.len() + QUESTION_FIXED_LEN;
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket = MutableDnsPacket::new(&mut buffer)
            .ok_or_else(|| DnsError::Encode(domain.to_string()))?;
        dns.set_id(id);
        dns.set_is_response(0);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_authoriative(0);
        dns.set_is_truncated(0);
        dns.set_is_recursion_desirable(1);
        dns.set_is_recursion_available(0);
        dns.set_zero_reserved(0);
        dns.set_is_non_authenticated_data(0);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(0);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    let mut cursor: usize = DNS_HDR_LEN;
    write_question(&mut buffer, &mut cursor, &qname);

    Ok(buffer)
}

/// Reads the id and first question name out of a query.
pub fn parse_question(payload: &[u8]) -> Result<DnsQuestion, DnsError> {
    let packet = Packet::parse(payload).map_err(|e| DnsError::Decode(e.to_string()))?;
    let question = packet
        .questions
        .first()
        .ok_or_else(|| DnsError::Decode("query carries no question".to_string()))?;
    Ok(DnsQuestion {
        id: packet.header.id,
        name: question.qname.to_string(),
    })
}

/// Answers `query` with one A record per address in `answers`.
///
/// Answer names point back at the question through name compression.
pub fn create_a_response(query: &[u8], answers: &[Ipv4Addr]) -> Result<Vec<u8>, DnsError> {
    let question: DnsQuestion = parse_question(query)?;
    let qname: Vec<u8> = encode_dns_name(&question.name)?;
    let answer_count =
        u16::try_from(answers.len()).map_err(|_| DnsError::Encode(question.name.clone()))?;
    let total: usize = DNS_HDR_LEN
        + qname.len()
        + QUESTION_FIXED_LEN
        + ANSWER_FIXED_LEN * answers.len();
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket = MutableDnsPacket::new(&mut buffer)
            .ok_or_else(|| DnsError::Encode(question.name.clone()))?;
        dns.set_id(question.id);
        dns.set_is_response(1);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_recursion_desirable(1);
        dns.set_is_recursion_available(1);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(answer_count);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    let mut cursor: usize = DNS_HDR_LEN;
    write_question(&mut buffer, &mut cursor, &qname);

    for addr in answers {
        // Pointer to the question name at offset 12.
        buffer[cursor..cursor + 2].copy_from_slice(&[0xC0, DNS_HDR_LEN as u8]);
        cursor += 2;
        buffer[cursor..cursor + 2].copy_from_slice(&DnsTypes::A.0.to_be_bytes());
        cursor += 2;
        buffer[cursor..cursor + 2].copy_from_slice(&CLASS_IN.0.to_be_bytes());
        cursor += 2;
        buffer[cursor..cursor + 4].copy_from_slice(&ANSWER_TTL.to_be_bytes());
        cursor += 4;
        buffer[cursor..cursor + 2].copy_from_slice(&4u16.to_be_bytes());
        cursor += 2;
        buffer[cursor..cursor + 4].copy_from_slice(&addr.octets());
        cursor += 4;
    }

    Ok(buffer)
}

fn write_question(buffer: &mut [u8], cursor: &mut usize, qname: &[u8]) {
    buffer[*cursor..*cursor + qname.len()].copy_from_slice(qname);
    *cursor += qname.len();

    let type_bytes: [u8; 2] = DnsTypes::A.0.to_be_bytes();
    buffer[*cursor..*cursor + 2].copy_from_slice(&type_bytes);
    *cursor += 2;

    let class_bytes: [u8; 2] = CLASS_IN.0.to_be_bytes();
    buffer[*cursor..*cursor + 2].copy_from_slice(&class_bytes);
    *cursor += 2;
}

fn encode_dns_name(name: &str) -> Result<Vec<u8>, DnsError> {
    let mut encoded: Vec<u8> = Vec::new();
    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DnsError::Encode(name.to_string()));
        }
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    Ok(encoded)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
