//! Length-prefixed binary encoding
//!
//! Every value persisted by the repository (commit objects, refs, HEAD, the staging pair and
//! the registries) goes through this codec. The format is little-endian throughout:
//!
//! - integers: fixed width (`u64`, `i64`)
//! - strings: `u64` byte length followed by the UTF-8 bytes
//! - sequences and sets: `u64` element count followed by each element
//! - maps: `u64` entry count followed by each key and value, in key order
//! - instants: `i64` seconds since the Unix epoch, sub-second precision dropped

use anyhow::Context;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Write};

/// Upper bound for pre-allocating collections from an untrusted length prefix
const MAX_PREALLOCATED_ITEMS: usize = 1024;

pub trait Encode {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()>;

    fn to_bytes(&self) -> anyhow::Result<Bytes> {
        let mut buffer = Vec::new();
        self.encode(&mut buffer)?;

        Ok(Bytes::from(buffer))
    }
}

pub trait Decode: Sized {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self>;

    /// Decode a value that must span the whole buffer
    fn from_bytes(data: &[u8]) -> anyhow::Result<Self> {
        let mut reader = Cursor::new(data);
        let value = Self::decode(&mut reader)?;

        if reader.position() as usize != data.len() {
            anyhow::bail!(
                "{} trailing bytes after encoded value",
                data.len() - reader.position() as usize
            );
        }

        Ok(value)
    }
}

fn read_len<R: Read>(reader: &mut R) -> anyhow::Result<usize> {
    let len = reader
        .read_u64::<LittleEndian>()
        .context("Unable to read length prefix")?;

    usize::try_from(len).context("Length prefix does not fit in memory")
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> anyhow::Result<()> {
    writer.write_u64::<LittleEndian>(len as u64)?;
    Ok(())
}

impl Encode for u64 {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        writer.write_u64::<LittleEndian>(*self)?;
        Ok(())
    }
}

impl Decode for u64 {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        Ok(reader.read_u64::<LittleEndian>()?)
    }
}

impl Encode for i64 {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        writer.write_i64::<LittleEndian>(*self)?;
        Ok(())
    }
}

impl Decode for i64 {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        Ok(reader.read_i64::<LittleEndian>()?)
    }
}

impl Encode for str {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        write_len(writer, self.len())?;
        writer.write_all(self.as_bytes())?;
        Ok(())
    }
}

impl Encode for String {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        self.as_str().encode(writer)
    }
}

impl Decode for String {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let len = read_len(reader)?;

        // read through `take` so a corrupt prefix cannot force a huge allocation
        let mut data = Vec::new();
        reader.take(len as u64).read_to_end(&mut data)?;
        if data.len() != len {
            anyhow::bail!("String truncated: expected {} bytes, got {}", len, data.len());
        }

        String::from_utf8(data).context("String is not valid UTF-8")
    }
}

impl Encode for DateTime<Utc> {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        self.timestamp().encode(writer)
    }
}

impl Decode for DateTime<Utc> {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let seconds = i64::decode(reader)?;

        DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| anyhow::anyhow!("Timestamp out of range: {}", seconds))
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        write_len(writer, self.len())?;
        self.iter().try_for_each(|item| item.encode(writer))
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        self.as_slice().encode(writer)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let len = read_len(reader)?;
        let mut items = Vec::with_capacity(len.min(MAX_PREALLOCATED_ITEMS));

        for _ in 0..len {
            items.push(T::decode(reader)?);
        }

        Ok(items)
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        write_len(writer, self.len())?;
        self.iter().try_for_each(|item| item.encode(writer))
    }
}

impl<T: Decode + Ord> Decode for BTreeSet<T> {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let len = read_len(reader)?;

        (0..len).map(|_| T::decode(reader)).collect()
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        write_len(writer, self.len())?;
        self.iter().try_for_each(|(key, value)| {
            key.encode(writer)?;
            value.encode(writer)
        })
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<R: Read>(reader: &mut R) -> anyhow::Result<Self> {
        let len = read_len(reader)?;

        (0..len)
            .map(|_| Ok((K::decode(reader)?, V::decode(reader)?)))
            .collect()
    }
}
