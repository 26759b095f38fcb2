//! Default nickname generation.

use rand::seq::SliceRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "clever", "jolly", "brave", "sly", "gentle", "swift", "quiet", "bold", "lucky", "mighty",
    "witty", "calm", "eager", "fuzzy", "happy",
];

const NOUNS: &[&str] = &[
    "panda", "fox", "raccoon", "otter", "badger", "falcon", "lynx", "heron", "beaver", "koala",
    "moose", "walrus", "gecko", "owl", "bison",
];

/// Produces a nickname for records created without one.
///
/// Called once per record; implementations must not cache a value.
pub trait NicknameGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<F> NicknameGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Random `adjective-noun-number` nicknames, e.g. `clever-otter-417`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNickname;

impl NicknameGenerator for RandomNickname {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("quiet");
        let noun = NOUNS.choose(&mut rng).copied().unwrap_or("owl");
        let number: u16 = rng.gen_range(0..1000);
        format!("{}-{}-{}", adjective, noun, number)
    }
}
