// Copyright 2021 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Comments for configuration + injection into output .toml
use std::collections::HashMap;

/// maps entries to Comments that should precede them
fn comments() -> HashMap<String, String> {
	let mut retval = HashMap::new();
	retval.insert(
		"config_file_version".to_string(),
		"
# Generated Configuration File for the nem tools
#
# When running the nem executable without specifying a configuration
# file, it will look for this file in two places, in the following
# order:
#
# -The working directory
# -[user home]/.nem
#
"
		.to_string(),
	);

	retval.insert(
		"[node]".to_string(),
		"
#########################################
### NODE CONFIGURATION                ###
#########################################

#NIS node transactions are announced to and mosaics looked up on
"
		.to_string(),
	);

	retval.insert(
		"host".to_string(),
		"
#host name or address of the node
"
		.to_string(),
	);

	retval.insert(
		"port".to_string(),
		"
#port of the NIS API, 7890 by default
"
		.to_string(),
	);

	retval.insert(
		"protocol".to_string(),
		"
#http or https
"
		.to_string(),
	);

	retval.insert(
		"network".to_string(),
		"
#network transactions are built for, one of:
#mainnet - the public NEM network (addresses start with N)
#testnet - the public test network (addresses start with T)
#mijin - private mijin chains (addresses start with M)
"
		.to_string(),
	);

	retval.insert(
		"[logging]".to_string(),
		"
#########################################
### LOGGING CONFIGURATION             ###
#########################################
"
		.to_string(),
	);

	retval.insert(
		"log_to_stdout".to_string(),
		"
#whether to log to stdout
"
		.to_string(),
	);

	retval.insert(
		"stdout_log_level".to_string(),
		"
#log level for stdout: Error, Warning, Info, Debug, Trace
"
		.to_string(),
	);

	retval.insert(
		"log_to_file".to_string(),
		"
#whether to log to a file
"
		.to_string(),
	);

	retval.insert(
		"file_log_level".to_string(),
		"
#log level for file: Error, Warning, Info, Debug, Trace
"
		.to_string(),
	);

	retval.insert(
		"log_file_path".to_string(),
		"
#log file path
"
		.to_string(),
	);

	retval.insert(
		"log_file_append".to_string(),
		"
#whether to append to the log file (true), or replace it on every run (false)
"
		.to_string(),
	);

	retval.insert(
		"log_max_size".to_string(),
		"
#maximum log file size in bytes before performing log rotation
#comment it to disable log rotation
"
		.to_string(),
	);

	retval.insert(
		"log_max_files".to_string(),
		"
#number of rotated log files to keep
"
		.to_string(),
	);

	retval.insert(
		"[[mosaics]]".to_string(),
		"
#########################################
### MOSAIC DEFINITIONS                ###
#########################################

#mosaics known without asking the node, used to price mosaic transfers.
#an entry named like a built-in mosaic (nem:xem, dim:coin, dim:token)
#replaces it
"
		.to_string(),
	);

	retval
}

fn get_key(line: &str) -> String {
	if line.contains('[') && line.contains(']') && !line.contains('=') {
		line.trim().to_owned()
	} else if line.contains('=') {
		line.split('=').next().unwrap_or("").trim().to_owned()
	} else {
		"NOT_FOUND".to_owned()
	}
}

/// Precedes the known keys of a serialized configuration with their
/// comments. Each comment is only inserted once, on the key's first
/// occurrence.
pub fn insert_comments(orig: String) -> String {
	let mut comments = comments();
	let mut ret_val = String::new();
	for l in orig.split('\n') {
		let key = get_key(l);
		if let Some(v) = comments.remove(&key) {
			ret_val.push_str(&v);
		}
		ret_val.push_str(l);
		ret_val.push('\n');
	}
	ret_val
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn comments_precede_their_keys() {
		let out = insert_comments("[node]\nhost = \"a\"\n".to_owned());
		let node = out.find("[node]").unwrap();
		assert!(out.find("NODE CONFIGURATION").unwrap() < node);
		assert!(out.find("#host name").unwrap() < out.find("host = ").unwrap());
	}

	#[test]
	fn repeated_tables_are_commented_once() {
		let out = insert_comments("[[mosaics]]\nname = \"a\"\n[[mosaics]]\nname = \"b\"\n".to_owned());
		assert_eq!(out.matches("MOSAIC DEFINITIONS").count(), 1);
	}
}
