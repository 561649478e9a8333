//! End-to-end scans against loopback HTTP servers. Nothing leaves the machine.

#[cfg(test)]
mod scan;
#[cfg(test)]
mod support;
