#![allow(dead_code)]

use ipalloc::{Address, IpAlloc, IpRange};

pub fn ip(s: &str) -> Address {
    s.parse().unwrap()
}

pub fn range(start: &str, end: &str) -> IpRange {
    IpRange {
        start: ip(start),
        end: ip(end),
    }
}

pub fn ipalloc(ranges: &[IpRange]) -> IpAlloc {
    let alloc = IpAlloc::new();
    for r in ranges {
        alloc.add_range(r.start, r.end).unwrap();
    }
    alloc
}

pub fn v4(n: u32) -> Address {
    std::net::Ipv4Addr::from(n).into()
}
