#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const BANNER_LOG: &str = concat!(
    "1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] \"GET /api/v2/banner/1 HTTP/1.1\" 200 927 \"-\" \"Lynx/2.8.8dev.9 libwww-FM/2.14\" \"-\" \"1498697422-2190034393-4708-9752759\" \"dc7161be3\" 0.390\n",
    "1.99.174.176 3b81f63526fa8  - [29/Jun/2017:03:50:22 +0300] \"GET /api/v2/banner/1 HTTP/1.1\" 200 12 \"-\" \"python-requests/2.13.0\" \"-\" \"1498697422-32900793-4708-9752770\" \"-\" 0.210\n",
    "1.169.137.128 -  - [29/Jun/2017:03:50:22 +0300] \"GET /api/v2/banner/2?page=1 HTTP/1.1\" 200 14 \"-\" \"Slotovod\" \"-\" \"1498697422-2118016444-4708-9752769\" \"712e90144abee9\" 0.100\n",
);

pub const MALFORMED_LINE: &str =
    "1.194.135.240 -  - [29/Jun/2017:03:50:23 +0300] \"GET /api/v2/group/7786679/statistic/sites/?date_type=day HTTP/1.1\" 200 22 \"-\" \"python-requests/2.13.0\"\n";

pub fn write_gz(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
    path
}

#[allow(deprecated)]
pub fn logstat_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("logstat")
}
