mod builder;
mod cipher;
mod page;
mod url;

pub use builder::{ProbePolicy, Vivo, resolve};
pub use cipher::{decode_source, query_unescape, rot47};
pub use page::{StreamConfig, extract_title, parse_stream_config};
pub use url::{URL_REGEX, normalize_url};
