//! 传输层：基于 reqwest 的 HTTP 客户端，负责模型接口调用与密钥解析。

pub mod http;

pub use http::HttpTransport;
