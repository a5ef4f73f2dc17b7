// SHA-1 engine: FIPS 180-1 vectors, chunking invariance, Digest helpers.

use mbdb_core::crypto::{sha1, Digest, Sha1};
use proptest::prelude::*;

const FIPS_56: &[u8] = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";

fn hex_of(d: Digest) -> String {
    d.to_hex()
}

// ## Published vectors

#[test]
fn abc_vector() {
    assert_eq!(hex_of(sha1(b"abc")), "a9993e364706816aba3e25717850c26c9cd0d89d");
}

#[test]
fn fips_56_byte_vector() {
    assert_eq!(FIPS_56.len(), 56);
    assert_eq!(hex_of(sha1(FIPS_56)), "84983e441c3bd26ebaae4aa1f95129e5e54670f1");
}

#[test]
fn million_a_vector() {
    let mut h = Sha1::new();
    let block = [b'a'; 1000];
    for _ in 0..1000 {
        h.update(&block);
    }
    assert_eq!(h.len(), 1_000_000);
    assert_eq!(hex_of(h.finalize()), "34aa973cd4c4daa4f61eeb2bdbad27316534016f");
}

#[test]
fn million_a_one_shot() {
    let data = vec![b'a'; 1_000_000];
    assert_eq!(hex_of(sha1(&data)), "34aa973cd4c4daa4f61eeb2bdbad27316534016f");
}

#[test]
fn empty_input() {
    assert_eq!(hex_of(Sha1::new().finalize()), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
}

#[test]
fn pangram() {
    assert_eq!(
        hex_of(sha1(b"The quick brown fox jumps over the lazy dog")),
        "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12"
    );
}

// ## Incremental behaviour

#[test]
fn byte_at_a_time_matches_one_shot() {
    let mut h = Sha1::new();
    for b in FIPS_56 {
        h.update(std::slice::from_ref(b));
    }
    assert_eq!(h.finalize(), sha1(FIPS_56));
}

#[test]
fn zero_length_updates_are_no_ops() {
    let mut h = Sha1::new();
    h.update(&[]);
    h.update(b"ab");
    h.update(&[]);
    h.update(b"c");
    h.update(&[]);
    assert_eq!(h.finalize(), sha1(b"abc"));
}

#[test]
fn padding_boundaries_agree_across_chunkings() {
    // 55/56 straddle the one-vs-two final block cut; 63/64/65 the block edge.
    for n in [55usize, 56, 57, 63, 64, 65, 119, 120, 128, 129] {
        let data: Vec<u8> = (0..n).map(|i| (i * 7 + 3) as u8).collect();
        let whole = sha1(&data);
        for split in [0, 1, n / 2, n.saturating_sub(1), n] {
            let mut h = Sha1::new();
            h.update(&data[..split]);
            h.update(&data[split..]);
            assert_eq!(h.finalize(), whole, "n={} split={}", n, split);
        }
    }
}

#[test]
fn many_blocks_in_one_update_after_partial_fill() {
    let data: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
    let mut h = Sha1::new();
    h.update(&data[..3]);
    h.update(&data[3..]);
    assert_eq!(h.finalize(), sha1(&data));
}

#[test]
fn independent_states_do_not_interfere() {
    let mut a = Sha1::new();
    let mut b = Sha1::new();
    a.update(b"ab");
    b.update(FIPS_56);
    a.update(b"c");
    assert_eq!(a.finalize(), sha1(b"abc"));
    assert_eq!(b.finalize(), sha1(FIPS_56));
}

#[test]
fn clone_forks_the_state() {
    let mut h = Sha1::new();
    h.update(b"ab");
    let fork = h.clone();
    h.update(b"c");
    assert_eq!(h.finalize(), sha1(b"abc"));
    assert_eq!(fork.finalize(), sha1(b"ab"));
}

// ## Digest value

#[test]
fn digest_hex_round_trip_and_case() {
    let d = sha1(b"abc");
    assert_eq!(d.to_string(), d.to_hex());
    assert_eq!(Digest::from_hex("A9993E364706816ABA3E25717850C26C9CD0D89D").unwrap(), d);
    assert!(Digest::from_hex("a9993e").is_err());
    assert_eq!(d.as_bytes()[0], 0xa9);
    assert_eq!(d.into_bytes()[19], 0x9d);
}

#[test]
fn digest_debug_is_hex() {
    let d = sha1(b"");
    assert_eq!(format!("{:?}", d), "Digest(da39a3ee5e6b4b0d3255bfef95601890afd80709)");
}

proptest! {
    #[test]
    fn prop_chunking_invariance(
        data in proptest::collection::vec(any::<u8>(), 0..600),
        cuts in proptest::collection::vec(any::<usize>(), 0..8),
    ) {
        let mut points: Vec<usize> = cuts.iter().map(|c| if data.is_empty() { 0 } else { c % (data.len() + 1) }).collect();
        points.sort_unstable();

        let mut h = Sha1::new();
        let mut prev = 0;
        for p in points {
            h.update(&data[prev..p]);
            prev = p;
        }
        h.update(&data[prev..]);

        prop_assert_eq!(h.finalize(), sha1(&data));
    }
}
