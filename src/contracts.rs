//! OFT and ERC-20 contract ABI definitions
//!
//! Uses alloy's sol! macro to generate type-safe bindings.

use alloy::sol;

sol! {
    /// Canonical send payload for an outbound transfer
    #[derive(Debug)]
    struct SendParam {
        uint32 dstEid;
        bytes32 to;
        uint256 amountLD;
        uint256 minAmountLD;
        bytes extraOptions;
        bytes composeMsg;
        bytes oftCmd;
    }

    /// Fee quote for delivering a message
    #[derive(Debug)]
    struct MessagingFee {
        uint256 nativeFee;
        uint256 lzTokenFee;
    }

    /// OFT contract interface: quote-before-send surface only
    #[sol(rpc)]
    contract IOFT {
        /// The underlying ERC-20 (the OFT itself, or the adapter's inner token)
        function token() external view returns (address inner);

        /// Read-only fee quote for delivering exactly this payload
        function quoteSend(SendParam calldata sendParam, bool payInLzToken)
            external view returns (MessagingFee memory msgFee);

        /// Submit the transfer; payable with the quoted native fee
        function send(
            SendParam calldata sendParam,
            MessagingFee calldata fee,
            address refundAddress
        ) external payable;
    }

    /// Minimal ERC-20 surface for token metadata
    #[sol(rpc)]
    contract IERC20 {
        function decimals() external view returns (uint8 count);
        function balanceOf(address account) external view returns (uint256 balance);
    }
}
