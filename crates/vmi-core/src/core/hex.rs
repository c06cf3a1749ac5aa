/// A hexadecimal representation of a value.
///
/// The value is zero-padded to the width of its type, which keeps
/// addresses and raw field values aligned in diagnostics.
///
/// # Examples
///
/// ```
/// # use vmi_core::Hex;
/// assert_eq!(format!("{}", Hex(42u16)), "0x002a");
/// assert_eq!(format!("{}", Hex(0x1018u32)), "0x00001018");
/// ```
pub struct Hex<T>(pub T);

fn fmt_padded<T>(f: &mut ::std::fmt::Formatter, data: T) -> ::std::fmt::Result
where
    T: Copy + ::std::fmt::LowerHex,
{
    match size_of::<T>() {
        1 => write!(f, "0x{:02x}", data),
        2 => write!(f, "0x{:04x}", data),
        4 => write!(f, "0x{:08x}", data),
        8 => write!(f, "0x{:016x}", data),
        _ => write!(f, "0x{:x}", data),
    }
}

macro_rules! impl_hex {
    ($($type:ty),*) => {
        $(
            impl ::std::fmt::Debug for Hex<$type> {
                fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                    fmt_padded(f, self.0)
                }
            }

            impl ::std::fmt::Display for Hex<$type> {
                fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                    fmt_padded(f, self.0)
                }
            }
        )*
    };
}

impl_hex!(u8, u16, u32, u64, usize);
