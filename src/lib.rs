// prompt2text deploy tooling.
//
// The library surface exists so the deployment sequence in `deploy` can be
// exercised against an in-memory control plane in integration tests; the
// `prompt2text` binary wires it to the real AWS SDK clients.

pub mod deploy;
