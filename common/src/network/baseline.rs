use std::collections::HashMap;
use std::net::Ipv4Addr;

/// Answers the trusted servers gave for each known domain.
///
/// Answers from every trusted server are concatenated in arrival order and
/// never deduplicated; only membership matters to the comparison. The set is
/// built once and read concurrently afterwards, so it exposes no mutation
/// beyond [`BaselineAnswerSet::record`], which takes `&mut self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaselineAnswerSet {
    answers: HashMap<String, Vec<Ipv4Addr>>,
}

impl BaselineAnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends answers for `domain`.
    pub fn record<I>(&mut self, domain: &str, addrs: I)
    where
        I: IntoIterator<Item = Ipv4Addr>,
    {
        self.answers
            .entry(domain.to_string())
            .or_default()
            .extend(addrs);
    }

    /// Every address recorded for `domain`, duplicates included.
    pub fn answers(&self, domain: &str) -> &[Ipv4Addr] {
        self.answers.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, domain: &str, addr: &Ipv4Addr) -> bool {
        self.answers(domain).contains(addr)
    }

    /// Domains out of `domains` for which no trusted server answered.
    ///
    /// Probes for these domains can never match.
    pub fn empty_domains<'a>(&self, domains: &'a [String]) -> Vec<&'a str> {
        domains
            .iter()
            .filter(|d| self.answers(d).is_empty())
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.values().all(Vec::is_empty)
    }
}
