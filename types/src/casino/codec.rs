use bytes::{Buf, BufMut};
use commonware_codec::{Error, Read, ReadExt, Write};

/// Helper to read a fixed-size grid of codec values.
pub fn read_array<T, const N: usize>(reader: &mut impl Buf) -> Result<[T; N], Error>
where
    T: Read<Cfg = ()> + Copy + Default,
{
    let mut out = [T::default(); N];
    for slot in out.iter_mut() {
        *slot = T::read(reader)?;
    }
    Ok(out)
}

/// Helper to write a list of cell indices as a length-prefixed byte string.
pub fn write_indices(indices: &[u8], writer: &mut impl BufMut) {
    (indices.len() as u8).write(writer);
    writer.put_slice(indices);
}

/// Helper to read a list of cell indices, rejecting lists longer than `max_len`
/// or naming a cell outside `0..max_len`.
pub fn read_indices(reader: &mut impl Buf, max_len: usize) -> Result<Vec<u8>, Error> {
    let len = u8::read(reader)? as usize;
    if len > max_len {
        return Err(Error::Invalid("Indices", "too long"));
    }
    if reader.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    let mut indices = vec![0u8; len];
    reader.copy_to_slice(&mut indices);
    if indices.iter().any(|&i| i as usize >= max_len) {
        return Err(Error::Invalid("Indices", "cell out of range"));
    }
    Ok(indices)
}

/// Helper to get encode size of an index list.
pub fn indices_encode_size(indices: &[u8]) -> usize {
    1 + indices.len()
}

/// Implements the one-byte codec for fieldless `#[repr(u8)]` enums that provide
/// `TryFrom<u8, Error = u8>`.
macro_rules! impl_u8_codec {
    ($($ty:ty),+ $(,)?) => {$(
        impl commonware_codec::Write for $ty {
            fn write(&self, writer: &mut impl bytes::BufMut) {
                commonware_codec::Write::write(&(*self as u8), writer);
            }
        }

        impl commonware_codec::Read for $ty {
            type Cfg = ();

            fn read_cfg(
                reader: &mut impl bytes::Buf,
                _: &Self::Cfg,
            ) -> Result<Self, commonware_codec::Error> {
                let value = <u8 as commonware_codec::ReadExt>::read(reader)?;
                Self::try_from(value).map_err(commonware_codec::Error::InvalidEnum)
            }
        }

        impl commonware_codec::FixedSize for $ty {
            const SIZE: usize = 1;
        }
    )+};
}

pub(crate) use impl_u8_codec;
