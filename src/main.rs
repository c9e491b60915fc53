// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use seqviewer::errors::SeqViewError;

fn main() -> Result<(), SeqViewError> {
    seqviewer::run()
}
