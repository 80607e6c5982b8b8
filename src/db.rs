pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod produto_repo;
pub use produto_repo::ProdutoRepository;
pub mod pedido_repo;
pub use pedido_repo::PedidoRepository;
