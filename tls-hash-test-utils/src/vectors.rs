//! Known-answer vectors
//!
//! Digests are lowercase hex. The composite vectors are the MD5 digest
//! followed by the SHA-1 digest of the same input.

use tls_hash_core::HashAlgorithm;

/// One expected digest
#[derive(Debug, Clone, Copy)]
pub struct KnownAnswer {
    pub algorithm: HashAlgorithm,
    pub input: &'static [u8],
    pub digest: &'static str,
}

impl KnownAnswer {
    /// Expected digest as bytes
    pub fn digest_bytes(&self) -> Vec<u8> {
        hex::decode(self.digest).unwrap()
    }
}

const fn answer(algorithm: HashAlgorithm, input: &'static [u8], digest: &'static str) -> KnownAnswer {
    KnownAnswer {
        algorithm,
        input,
        digest,
    }
}

/// Two-block message from FIPS 180
pub const TWO_BLOCK_MESSAGE: &[u8] = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";

pub const KNOWN_ANSWERS: &[KnownAnswer] = &[
    answer(HashAlgorithm::None, b"", ""),
    answer(HashAlgorithm::None, b"abc", ""),
    answer(HashAlgorithm::MD5, b"", "d41d8cd98f00b204e9800998ecf8427e"),
    answer(HashAlgorithm::MD5, b"abc", "900150983cd24fb0d6963f7d28e17f72"),
    answer(
        HashAlgorithm::SHA1,
        b"",
        "da39a3ee5e6b4b0d3255bfef95601890afd80709",
    ),
    answer(
        HashAlgorithm::SHA1,
        b"abc",
        "a9993e364706816aba3e25717850c26c9cd0d89d",
    ),
    answer(
        HashAlgorithm::SHA1,
        TWO_BLOCK_MESSAGE,
        "84983e441c3bd26ebaae4aa1f95129e5e54670f1",
    ),
    answer(
        HashAlgorithm::SHA224,
        b"",
        "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f",
    ),
    answer(
        HashAlgorithm::SHA224,
        b"abc",
        "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7",
    ),
    answer(
        HashAlgorithm::SHA256,
        b"",
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    ),
    answer(
        HashAlgorithm::SHA256,
        b"abc",
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
    ),
    answer(
        HashAlgorithm::SHA256,
        TWO_BLOCK_MESSAGE,
        "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1",
    ),
    answer(
        HashAlgorithm::SHA384,
        b"",
        "38b060a751ac96384cd9327eb1b1e36a21fdb71114be07434c0cc7bf63f6e1da274edebfe76f65fbd51ad2f14898b95b",
    ),
    answer(
        HashAlgorithm::SHA384,
        b"abc",
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7",
    ),
    answer(
        HashAlgorithm::SHA512,
        b"",
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
    ),
    answer(
        HashAlgorithm::SHA512,
        b"abc",
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
    ),
    answer(
        HashAlgorithm::MD5SHA1,
        b"",
        "d41d8cd98f00b204e9800998ecf8427eda39a3ee5e6b4b0d3255bfef95601890afd80709",
    ),
    answer(
        HashAlgorithm::MD5SHA1,
        b"abc",
        "900150983cd24fb0d6963f7d28e17f72a9993e364706816aba3e25717850c26c9cd0d89d",
    ),
];

/// Known answers for one algorithm
pub fn answers_for(alg: HashAlgorithm) -> impl Iterator<Item = &'static KnownAnswer> {
    KNOWN_ANSWERS.iter().filter(move |answer| answer.algorithm == alg)
}
