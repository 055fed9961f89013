//! Walks through a union with overlapping bitfields, arrays and a string.
//!
//! Run with `RUST_LOG=trace` to see every field write.

use std::sync::Arc;

use bitunion::{
    Error, Field, Schema, Union,
    encoding::Encoding,
    value::Endian,
};

fn main() -> Result<(), Error> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let some = Arc::new(Schema::compile(
        "Some",
        &[
            Field::bitfield_mask("x", 0xff00),
            Field::bitfield("y", 8, 0),
            Field::scalar("foo"),
            Field::array("bar", 8, 4, Endian::Little),
            Field::array("baz", 4, 8, Endian::Little),
            Field::string("string", 4, 0, Encoding::Utf8),
        ],
    )?);

    let mut x = Union::new(some.clone(), 1024);
    println!("{x}");

    x.set("y", 64u32)?;
    println!("{x}");

    x.set("x", 3u32)?;
    println!("{x}");

    x.set("foo", 2048u32)?;
    println!("{x}");

    let mut y = Union::with_values(some, 0, [("x", 4u32), ("y", 64)])?;
    println!("{y}");

    y.set("bar", [120u128, 86, 52, 18])?;
    println!("{y}");

    y.set("foo", 0x12345678u32)?;
    println!("{y}");

    y.set("string", "Test")?;
    println!("{y}");

    Ok(())
}
