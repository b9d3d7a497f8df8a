pub type RpcAddress = bitcann_addresses::Address;
