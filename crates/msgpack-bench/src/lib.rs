//! Benchmark datasets for `msgpack-codec`.
//!
//! [`datasets`] builds the same named inputs on every call for a given seed:
//! a list of user maps, the same users as [`Record`]s, and 100 000-element
//! bool/float/int arrays both as plain [`Value`] arrays and as
//! [`NumericArray`]s.

use chrono::{DateTime, SecondsFormat};
use msgpack_codec::{NumericArray, Record, Value};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

pub const USER_COUNT: usize = 1000;
pub const ARRAY_LEN: usize = 100_000;

/// Microseconds from 1970-01-01 to 2514-01-01, the upper bound for
/// generated timestamps.
const MAX_TIME_MICROS: i64 = 17_166_988_800_000_000;

const ASCII_LETTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    User = 1,
    Admin = 2,
    System = 3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub score: f64,
    pub uid: String,
}

impl Group {
    fn to_map(&self) -> Value {
        Value::map([
            ("name", Value::from(self.name.as_str())),
            ("score", Value::from(self.score)),
            ("uid", Value::from(self.uid.as_str())),
        ])
    }

    fn to_record(&self) -> Record {
        Record::new("GroupModel")
            .with_field("name", self.name.as_str())
            .with_field("score", self.score)
            .with_field("uid", self.uid.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub active: bool,
    /// RFC 3339 timestamp.
    pub created_time: String,
    pub groups: Vec<Group>,
    pub name: String,
    pub score: i64,
    pub user_type: UserType,
    pub uid: String,
}

impl User {
    /// Map form with keys in field order.
    pub fn to_map(&self) -> Value {
        Value::map([
            ("active", Value::from(self.active)),
            ("created_time", Value::from(self.created_time.as_str())),
            (
                "groups",
                Value::Array(self.groups.iter().map(Group::to_map).collect()),
            ),
            ("name", Value::from(self.name.as_str())),
            ("score", Value::from(self.score)),
            ("type", Value::from(self.user_type as i64)),
            ("uid", Value::from(self.uid.as_str())),
        ])
    }

    pub fn to_record(&self) -> Record {
        Record::new("UserModel")
            .with_field("active", self.active)
            .with_field("created_time", self.created_time.as_str())
            .with_field(
                "groups",
                Value::Array(
                    self.groups
                        .iter()
                        .map(|g| Value::from(g.to_record()))
                        .collect(),
                ),
            )
            .with_field("name", self.name.as_str())
            .with_field("score", self.score)
            .with_field("type", self.user_type as i64)
            .with_field("uid", self.uid.as_str())
    }
}

/// Seeded source of benchmark data. Each generator owns its PRNG.
pub struct Generator {
    rng: Xoshiro256StarStar,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    pub fn bool_array(&mut self, size: usize) -> Vec<bool> {
        (0..size).map(|_| self.rng.gen()).collect()
    }

    /// Uniform floats in `[0, 1)`.
    pub fn float_array(&mut self, size: usize) -> Vec<f64> {
        (0..size).map(|_| self.rng.gen()).collect()
    }

    /// Integers over the whole `i64` range.
    pub fn int_array(&mut self, size: usize) -> Vec<i64> {
        (0..size).map(|_| self.rng.gen()).collect()
    }

    pub fn datetime(&mut self) -> String {
        let micros = self.rng.gen_range(0..=MAX_TIME_MICROS);
        DateTime::from_timestamp_micros(micros)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            .unwrap_or_default()
    }

    /// 1 to 64 characters, all from one alphabet: ASCII letters or hiragana.
    pub fn string(&mut self) -> String {
        let len = self.rng.gen_range(1..=64);
        if self.rng.gen() {
            let letters = ASCII_LETTERS.as_bytes();
            (0..len)
                .map(|_| char::from(letters[self.rng.gen_range(0..letters.len())]))
                .collect()
        } else {
            (0..len)
                .filter_map(|_| char::from_u32(self.rng.gen_range(0x3040..0x309f)))
                .collect()
        }
    }

    pub fn uuid4(&mut self) -> String {
        let bytes: [u8; 16] = self.rng.gen();
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .hyphenated()
            .to_string()
    }

    pub fn user(&mut self) -> User {
        let name = self.string();
        let active = self.rng.gen();
        let created_time = self.datetime();
        let group_count = self.rng.gen_range(1..=4);
        let groups = (0..group_count)
            .map(|_| Group {
                name: self.string(),
                score: self.rng.gen(),
                uid: self.uuid4(),
            })
            .collect();
        let score = self.rng.gen();
        let user_type = *[UserType::User, UserType::Admin, UserType::System]
            .choose(&mut self.rng)
            .unwrap_or(&UserType::User);
        User {
            active,
            created_time,
            groups,
            name,
            score,
            user_type,
            uid: self.uuid4(),
        }
    }
}

/// Named datasets in a fixed order, all derived from `seed`.
pub fn datasets(seed: u64) -> Vec<(&'static str, Value)> {
    let mut generator = Generator::new(seed);
    let users: Vec<User> = (0..USER_COUNT).map(|_| generator.user()).collect();
    let bools = generator.bool_array(ARRAY_LEN);
    let floats = generator.float_array(ARRAY_LEN);
    let ints = generator.int_array(ARRAY_LEN);

    vec![
        (
            "dict",
            Value::Array(users.iter().map(User::to_map).collect()),
        ),
        (
            "pydantic",
            Value::Array(users.iter().map(|u| Value::from(u.to_record())).collect()),
        ),
        (
            "bool",
            Value::Array(bools.iter().copied().map(Value::from).collect()),
        ),
        (
            "float",
            Value::Array(floats.iter().copied().map(Value::from).collect()),
        ),
        (
            "int",
            Value::Array(ints.iter().copied().map(Value::from).collect()),
        ),
        ("numpy.bool", Value::from(NumericArray::new(bools))),
        ("numpy.float", Value::from(NumericArray::new(floats))),
        ("numpy.int", Value::from(NumericArray::new(ints))),
    ]
}
