mod external;

pub use external::{extract_ip, get_external_ip, DEFAULT_LOOKUP_URLS};
