#![cfg(test)]

mod discovery;
mod support;
